use axum::{
    extract::{Multipart, Path, Query, State},
    middleware,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use serde_json::json;
use uuid::Uuid;

use crate::controllers::admin_controller::AdminController;
use crate::controllers::location_controller::LocationController;
use crate::controllers::mill_controller::MillController;
use crate::controllers::trip_controller::TripController;
use crate::controllers::truck_controller::TruckController;
use crate::dto::location_dto::{CreateLocationRequest, LocationListResponse, LocationResponse};
use crate::dto::mill_dto::{CreateMillRequest, MillListResponse, MillResponse, UpdateMillRequest};
use crate::dto::trip_dto::TripListResponse;
use crate::dto::truck_dto::{
    CreateTruckRequest, TruckListResponse, TruckResponse, UpdateTruckRequest,
};
use crate::dto::user_dto::{
    AdminLoginRequest, AuthResponse, CreateSalePersonRequest, UpdateAdminProfileRequest,
    UpdateProfileFields, UserListResponse, UserResponse,
};
use crate::dto::{ApiResponse, PageQuery};
use crate::middleware::auth::{admin_only_middleware, auth_middleware, AuthenticatedUser};
use crate::routes::read_multipart;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::JwtConfig;

pub fn create_admin_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/update-profile", put(update_admin_profile))
        // usuarios
        .route("/users", get(list_users))
        .route("/user/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/sale-person", post(create_sale_person))
        .route("/sale-person/:id", delete(delete_sale_person))
        // flota y referencia
        .route("/truck", post(create_truck))
        .route("/trucks", get(list_trucks))
        .route("/truck/:id", get(get_truck).put(update_truck).delete(delete_truck))
        .route("/location", post(create_location))
        .route("/locations", get(list_locations))
        .route(
            "/location/:id",
            get(get_location).put(update_location).delete(delete_location),
        )
        .route("/mill", post(create_mill))
        .route("/mills", get(list_mills))
        .route("/mill/:id", get(get_mill).put(update_mill).delete(delete_mill))
        // viajes
        .route("/trips", get(list_trips))
        .route("/trip/:id", delete(delete_trip))
        // subidas de imágenes
        .route("/image", post(upload_single_image))
        .route("/images", post(upload_multiple_images))
        .route_layer(middleware::from_fn(admin_only_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new().route("/login", post(admin_login)).merge(protected)
}

fn admin_controller(state: &AppState) -> AdminController {
    AdminController::new(
        state.pool.clone(),
        state.storage.clone(),
        JwtConfig::from(&state.config),
    )
}

async fn admin_login(
    State(state): State<AppState>,
    Json(request): Json<AdminLoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = admin_controller(&state).login(request).await?;
    Ok(Json(response))
}

async fn update_admin_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateAdminProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let response = admin_controller(&state)
        .update_profile(
            user.user_id,
            request.firstname,
            request.lastname,
            request.email,
            request.mobile_no,
            request.profile_url,
            request.password,
        )
        .await?;
    Ok(Json(response))
}

async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<UserListResponse>, AppError> {
    let response = admin_controller(&state).list_users(&query).await?;
    Ok(Json(response))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let response = admin_controller(&state).get_user(id).await?;
    Ok(Json(response))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProfileFields>,
) -> Result<Json<UserResponse>, AppError> {
    let response = admin_controller(&state)
        .update_user(id, request.firstname, request.lastname, request.email)
        .await?;
    Ok(Json(response))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let response = admin_controller(&state).delete_user(id).await?;
    Ok(Json(response))
}

async fn create_sale_person(
    State(state): State<AppState>,
    Json(request): Json<CreateSalePersonRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let response = admin_controller(&state).create_sale_person(request).await?;
    Ok(Json(response))
}

async fn delete_sale_person(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let response = admin_controller(&state).delete_sale_person(id).await?;
    Ok(Json(response))
}

async fn create_truck(
    State(state): State<AppState>,
    Json(request): Json<CreateTruckRequest>,
) -> Result<Json<ApiResponse<TruckResponse>>, AppError> {
    let controller = TruckController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_trucks(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<TruckListResponse>, AppError> {
    let controller = TruckController::new(state.pool.clone());
    let response = controller.list(&query).await?;
    Ok(Json(response))
}

async fn get_truck(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TruckResponse>, AppError> {
    let controller = TruckController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_truck(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTruckRequest>,
) -> Result<Json<TruckResponse>, AppError> {
    let controller = TruckController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_truck(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = TruckController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}

async fn create_location(
    State(state): State<AppState>,
    Json(request): Json<CreateLocationRequest>,
) -> Result<Json<ApiResponse<LocationResponse>>, AppError> {
    let controller = LocationController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_locations(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<LocationListResponse>, AppError> {
    let controller = LocationController::new(state.pool.clone());
    let response = controller.list(&query).await?;
    Ok(Json(response))
}

async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LocationResponse>, AppError> {
    let controller = LocationController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateLocationRequest>,
) -> Result<Json<LocationResponse>, AppError> {
    let controller = LocationController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_location(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = LocationController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}

async fn create_mill(
    State(state): State<AppState>,
    Json(request): Json<CreateMillRequest>,
) -> Result<Json<ApiResponse<MillResponse>>, AppError> {
    let controller = MillController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_mills(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<MillListResponse>, AppError> {
    let controller = MillController::new(state.pool.clone());
    let response = controller.list(&query).await?;
    Ok(Json(response))
}

async fn get_mill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MillResponse>, AppError> {
    let controller = MillController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_mill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMillRequest>,
) -> Result<Json<MillResponse>, AppError> {
    let controller = MillController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_mill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = MillController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}

async fn list_trips(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<TripListResponse>, AppError> {
    let controller = TripController::new(state.pool.clone());
    let response = controller.list(&query).await?;
    Ok(Json(response))
}

async fn delete_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = TripController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}

async fn upload_single_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, AppError> {
    let (_, mut files) = read_multipart(multipart).await?;
    let file = files
        .pop()
        .ok_or_else(|| AppError::BadRequest("Invalid File (Image/PDF).".to_string()))?;

    let location = admin_controller(&state).upload_single_image(file).await?;
    Ok(Json(json!({ "data": { "location": location } })))
}

async fn upload_multiple_images(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, AppError> {
    let (_, files) = read_multipart(multipart).await?;
    if files.is_empty() {
        return Err(AppError::BadRequest("Invalid Image".to_string()));
    }

    let locations = admin_controller(&state).upload_multiple_images(files).await?;
    Ok(Json(json!({ "data": { "location": locations } })))
}
