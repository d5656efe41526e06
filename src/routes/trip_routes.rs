use axum::{
    extract::{Multipart, Path, Query, State},
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::sub_trip_controller::SubTripController;
use crate::controllers::trip_controller::TripController;
use crate::dto::sub_trip_dto::{CreateSubTripRequest, SubTripMilestone, SubTripResponse};
use crate::dto::trip_dto::{
    CreateTripRequest, CurrentTripQuery, TripHistoryEntry, TripMilestone, TripResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::routes::read_multipart;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::validate_uuid;

pub fn create_trip_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_trip))
        .route("/current", get(get_current_trip))
        .route("/history", get(get_trip_history))
        .route("/shift-change/:id", put(shift_change))
        .route("/sub-trip", post(create_sub_trip))
        .route("/sub-trip/:id", put(update_sub_trip))
        .route("/:id/sub-trip", get(get_sub_trip))
        .route("/:id", put(update_trip))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn create_trip(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateTripRequest>,
) -> Result<Json<ApiResponse<TripResponse>>, AppError> {
    let controller = TripController::new(state.pool.clone());
    let response = controller.create(user.user_id, request).await?;
    Ok(Json(response))
}

async fn get_current_trip(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<CurrentTripQuery>,
) -> Result<Json<TripResponse>, AppError> {
    let controller = TripController::new(state.pool.clone());
    let response = controller.current(user.user_id, query.id).await?;
    Ok(Json(response))
}

async fn get_trip_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<TripHistoryEntry>>, AppError> {
    let controller = TripController::new(state.pool.clone());
    let response = controller.history(user.user_id).await?;
    Ok(Json(response))
}

async fn shift_change(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TripResponse>>, AppError> {
    let controller = TripController::new(state.pool.clone());
    let response = controller.shift_change(id, user.user_id).await?;
    Ok(Json(response))
}

async fn update_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(milestone): Json<TripMilestone>,
) -> Result<Json<TripResponse>, AppError> {
    let controller = TripController::new(state.pool.clone());
    let response = controller.update(id, milestone).await?;
    Ok(Json(response))
}

/// Multipart: campos del sub-viaje + documentos adjuntos
async fn create_sub_trip(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<SubTripResponse>>, AppError> {
    let (fields, files) = read_multipart(multipart).await?;

    let request = CreateSubTripRequest {
        trip: parse_uuid_field(&fields, "trip")?,
        mill_id: parse_uuid_field(&fields, "mill_id")?,
        source: parse_uuid_field(&fields, "source")?,
        dest: parse_uuid_field(&fields, "dest")?,
        slip_id: fields.get("slip_id").cloned(),
        block_name: fields.get("block_name").cloned(),
        block_no: fields.get("block_no").cloned(),
        prod_detail: fields.get("prod_detail").cloned(),
    };

    let controller = SubTripController::new(state.pool.clone(), state.storage.clone());
    let response = controller.create(request, files).await?;
    Ok(Json(response))
}

async fn update_sub_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(milestone): Json<SubTripMilestone>,
) -> Result<Json<SubTripResponse>, AppError> {
    let controller = SubTripController::new(state.pool.clone(), state.storage.clone());
    let response = controller.update(id, milestone).await?;
    Ok(Json(response))
}

async fn get_sub_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubTripResponse>, AppError> {
    let controller = SubTripController::new(state.pool.clone(), state.storage.clone());
    let response = controller.get_by_trip(id).await?;
    Ok(Json(response))
}

fn parse_uuid_field(
    fields: &std::collections::HashMap<String, String>,
    name: &str,
) -> Result<Option<Uuid>, AppError> {
    match fields.get(name) {
        Some(value) => {
            let id = validate_uuid(value)
                .map_err(|_| AppError::BadRequest(format!("Invalid {} ID", name)))?;
            Ok(Some(id))
        }
        None => Ok(None),
    }
}
