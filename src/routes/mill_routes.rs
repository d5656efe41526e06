use axum::{
    extract::{Query, State},
    middleware,
    routing::get,
    Json, Router,
};

use crate::controllers::mill_controller::MillController;
use crate::dto::mill_dto::MillListResponse;
use crate::dto::PageQuery;
use crate::middleware::auth::auth_middleware;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_mill_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_mills))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn list_mills(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<MillListResponse>, AppError> {
    let controller = MillController::new(state.pool.clone());
    let response = controller.list(&query).await?;
    Ok(Json(response))
}
