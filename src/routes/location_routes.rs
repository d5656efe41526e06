use axum::{
    extract::{Query, State},
    middleware,
    routing::get,
    Json, Router,
};

use crate::controllers::location_controller::LocationController;
use crate::dto::location_dto::LocationListResponse;
use crate::dto::PageQuery;
use crate::middleware::auth::auth_middleware;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_location_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_locations))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn list_locations(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<LocationListResponse>, AppError> {
    let controller = LocationController::new(state.pool.clone());
    let response = controller.list(&query).await?;
    Ok(Json(response))
}
