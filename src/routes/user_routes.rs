use axum::{
    extract::{Multipart, State},
    middleware,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};

use crate::controllers::user_controller::UserController;
use crate::dto::user_dto::{
    AuthResponse, LoginRequest, RegisterUserRequest, UpdateProfileFields, UserLogResponse,
    UserResponse, VerifyOtpRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::routes::read_multipart;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::JwtConfig;

pub fn create_user_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/profile", get(get_profile))
        .route("/update-profile", put(update_profile))
        .route("/delete-account", delete(delete_account))
        .route("/check-in", put(check_in))
        .route("/check-out", put(check_out))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/verify-otp", post(verify_otp))
        .route("/resend-otp", post(resend_otp))
        .merge(protected)
}

fn controller(state: &AppState) -> UserController {
    UserController::new(
        state.pool.clone(),
        state.otp.clone(),
        state.otp_limiter.clone(),
        state.storage.clone(),
        JwtConfig::from(&state.config),
    )
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let response = controller(&state).register(request).await?;
    Ok(Json(response))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let response = controller(&state).login(request).await?;
    Ok(Json(response))
}

async fn verify_otp(
    State(state): State<AppState>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = controller(&state).verify_otp(request).await?;
    Ok(Json(response))
}

async fn resend_otp(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let response = controller(&state).resend_otp(request).await?;
    Ok(Json(response))
}

async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<UserResponse>, AppError> {
    let response = controller(&state).get_profile(user.user_id).await?;
    Ok(Json(response))
}

/// Multipart: campos firstname/lastname/email + archivo opcional profile_img
async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let (mut fields, mut files) = read_multipart(multipart).await?;

    let update = UpdateProfileFields {
        firstname: fields.remove("firstname"),
        lastname: fields.remove("lastname"),
        email: fields.remove("email"),
    };
    let profile_img = files.pop();

    let response = controller(&state)
        .update_profile(user.user_id, update, profile_img)
        .await?;
    Ok(Json(response))
}

async fn delete_account(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let response = controller(&state).delete_account(user.user_id).await?;
    Ok(Json(response))
}

async fn check_in(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<UserLogResponse>, AppError> {
    let response = controller(&state).check_in(user.user_id).await?;
    Ok(Json(response))
}

async fn check_out(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<UserLogResponse>, AppError> {
    let response = controller(&state).check_out(user.user_id).await?;
    Ok(Json(response))
}
