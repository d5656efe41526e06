//! Controlador del portal de administración

use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::clients::{StorageGateway, UploadFile};
use crate::dto::user_dto::{
    AdminLoginRequest, AuthResponse, CreateSalePersonRequest, UserListResponse, UserResponse,
};
use crate::dto::{ApiResponse, PageQuery};
use crate::models::user::ROLE_ADMIN;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppError;
use crate::utils::jwt::{generate_token, JwtConfig};

// registros sin verificar más viejos que esto se barren en el listado
const STALE_REGISTRATION_MINUTES: i64 = 10;

const UPLOADS_DIR: &str = "uploads";

pub struct AdminController {
    repository: UserRepository,
    storage: Arc<dyn StorageGateway>,
    jwt_config: JwtConfig,
}

impl AdminController {
    pub fn new(pool: PgPool, storage: Arc<dyn StorageGateway>, jwt_config: JwtConfig) -> Self {
        Self {
            repository: UserRepository::new(pool),
            storage,
            jwt_config,
        }
    }

    pub async fn login(&self, request: AdminLoginRequest) -> Result<AuthResponse, AppError> {
        let (email, password) = match (request.email, request.password) {
            (Some(email), Some(password)) => (email, password),
            _ => {
                return Err(AppError::Validation(
                    "Please enter your email and password".to_string(),
                ))
            }
        };

        let user = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        let password_hash = user
            .password_hash
            .as_deref()
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        let matched = verify(&password, password_hash)
            .map_err(|e| AppError::Internal(format!("Error verifying password: {}", e)))?;

        if !matched {
            return Err(AppError::Unauthorized("Invalid email or password!".to_string()));
        }

        if user.role != ROLE_ADMIN {
            return Err(AppError::Unauthorized(
                "Only Admin can access the portal.".to_string(),
            ));
        }

        let token = generate_token(user.id, &user.role, &self.jwt_config)?;

        Ok(AuthResponse {
            user: user.into(),
            token,
            message: "Login successful".to_string(),
        })
    }

    pub async fn update_profile(
        &self,
        admin_id: Uuid,
        firstname: Option<String>,
        lastname: Option<String>,
        email: Option<String>,
        mobile_no: Option<String>,
        profile_url: Option<String>,
        password: Option<String>,
    ) -> Result<UserResponse, AppError> {
        let password_hash = match password {
            Some(password) if !password.is_empty() => Some(
                hash(&password, DEFAULT_COST)
                    .map_err(|e| AppError::Internal(format!("Error hashing password: {}", e)))?,
            ),
            _ => None,
        };

        let user = self
            .repository
            .update_admin(admin_id, firstname, lastname, email, mobile_no, profile_url, password_hash)
            .await?;

        Ok(user.into())
    }

    /// Listado de usuarios. Antes de listar se barren los registros sin
    /// verificar más viejos que 10 minutos, inline (no hay tareas de fondo).
    pub async fn list_users(&self, query: &PageQuery) -> Result<UserListResponse, AppError> {
        let swept = self
            .repository
            .delete_stale_unverified(STALE_REGISTRATION_MINUTES)
            .await?;
        if swept > 0 {
            tracing::info!("Barridos {} registros sin verificar", swept);
        }

        let (users, total) = self
            .repository
            .list(query.role.as_deref(), query.search.as_deref(), query.limit_offset())
            .await?;

        Ok(UserListResponse {
            users: users.into_iter().map(UserResponse::from).collect(),
            users_count: total,
        })
    }

    pub async fn get_user(&self, id: Uuid) -> Result<UserResponse, AppError> {
        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

        Ok(user.into())
    }

    pub async fn update_user(
        &self,
        id: Uuid,
        firstname: Option<String>,
        lastname: Option<String>,
        email: Option<String>,
    ) -> Result<UserResponse, AppError> {
        let user = self
            .repository
            .update_profile(id, firstname, lastname, email, None)
            .await?;

        Ok(user.into())
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        self.repository.delete(id).await?;
        Ok(ApiResponse::message_only("User Deleted successfully.".to_string()))
    }

    pub async fn create_sale_person(
        &self,
        request: CreateSalePersonRequest,
    ) -> Result<ApiResponse<UserResponse>, AppError> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let user = self
            .repository
            .create_sale_person(
                request.firstname,
                request.lastname,
                request.country_code,
                request.mobile_no,
                request.email,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            user.into(),
            "Sale person creado exitosamente".to_string(),
        ))
    }

    pub async fn delete_sale_person(&self, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Sale Person not found".to_string()))?;

        self.repository.delete(user.id).await?;
        Ok(ApiResponse::message_only("Sale Person Deleted successfully.".to_string()))
    }

    pub async fn upload_single_image(&self, file: UploadFile) -> Result<String, AppError> {
        self.storage.store(file, UPLOADS_DIR).await
    }

    pub async fn upload_multiple_images(
        &self,
        files: Vec<UploadFile>,
    ) -> Result<Vec<String>, AppError> {
        self.storage.store_many(files, UPLOADS_DIR).await
    }
}
