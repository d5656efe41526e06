use axum::{
    extract::{Query, State},
    middleware,
    routing::get,
    Json, Router,
};

use crate::controllers::truck_controller::TruckController;
use crate::dto::truck_dto::TruckListResponse;
use crate::dto::PageQuery;
use crate::middleware::auth::auth_middleware;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_truck_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/all", get(list_trucks))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn list_trucks(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<TruckListResponse>, AppError> {
    let controller = TruckController::new(state.pool.clone());
    let response = controller.list(&query).await?;
    Ok(Json(response))
}
