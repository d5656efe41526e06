use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::user::{User, UserLog};

// Request para registrar un usuario (conductor por defecto)
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub firstname: String,

    #[validate(length(min = 1, max = 100))]
    pub lastname: String,

    pub country_code: Option<String>,
    pub mobile_no: Option<String>,
}

// Request de login por número de móvil
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub mobile_no: Option<String>,
}

// Request de verificación de OTP
#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub mobile_no: Option<String>,
    pub code: Option<String>,
}

// Request de login de administrador (email + password)
#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

// Request para crear un sale-person desde el portal
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSalePersonRequest {
    #[validate(length(min = 1, max = 100))]
    pub firstname: String,

    #[validate(length(min = 1, max = 100))]
    pub lastname: String,

    pub country_code: String,
    pub mobile_no: String,

    #[validate(email)]
    pub email: Option<String>,
}

// Request de actualización del perfil de administrador
#[derive(Debug, Deserialize)]
pub struct UpdateAdminProfileRequest {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub mobile_no: Option<String>,
    pub profile_url: Option<String>,
    pub password: Option<String>,
}

// Campos de perfil editables (los archivos llegan aparte por multipart)
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileFields {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
}

// Response de usuario (sin password_hash)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub country_code: String,
    pub mobile_no: String,
    pub email: Option<String>,
    pub role: String,
    pub profile_url: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            firstname: user.firstname,
            lastname: user.lastname,
            country_code: user.country_code,
            mobile_no: user.mobile_no,
            email: user.email,
            role: user.role,
            profile_url: user.profile_url,
            verified: user.verified,
            created_at: user.created_at,
        }
    }
}

// Response de login/verificación: usuario + token
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
    pub message: String,
}

// Response de listados de usuarios con total
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub users_count: i64,
}

// Response de check-in / check-out
#[derive(Debug, Serialize)]
pub struct UserLogResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl From<UserLog> for UserLogResponse {
    fn from(log: UserLog) -> Self {
        Self {
            id: log.id,
            user_id: log.user_id,
            start_time: log.start_time,
            end_time: log.end_time,
        }
    }
}
