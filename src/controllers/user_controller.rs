//! Controlador de usuarios (conductores)
//!
//! El registro agrupa el insert del usuario y el despacho del OTP en una
//! transacción: si el proveedor falla, el insert se revierte y no queda
//! estado parcial.

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::clients::{OtpGateway, StorageGateway, UploadFile};
use crate::dto::user_dto::{
    AuthResponse, LoginRequest, RegisterUserRequest, UpdateProfileFields, UserLogResponse,
    UserResponse, VerifyOtpRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::rate_limit::OtpRateLimiter;
use crate::models::user::{User, ROLE_DRIVER};
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppError;
use crate::utils::jwt::{generate_token, JwtConfig};
use crate::utils::validation::{validate_country_code, validate_mobile_no};

const PROFILE_DIR: &str = "profile-images";

pub struct UserController {
    pool: PgPool,
    repository: UserRepository,
    otp: Arc<dyn OtpGateway>,
    otp_limiter: OtpRateLimiter,
    storage: Arc<dyn StorageGateway>,
    jwt_config: JwtConfig,
}

impl UserController {
    pub fn new(
        pool: PgPool,
        otp: Arc<dyn OtpGateway>,
        otp_limiter: OtpRateLimiter,
        storage: Arc<dyn StorageGateway>,
        jwt_config: JwtConfig,
    ) -> Self {
        Self {
            repository: UserRepository::new(pool.clone()),
            pool,
            otp,
            otp_limiter,
            storage,
            jwt_config,
        }
    }

    pub async fn register(
        &self,
        request: RegisterUserRequest,
    ) -> Result<ApiResponse<()>, AppError> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let mobile_no = request
            .mobile_no
            .ok_or_else(|| AppError::Validation("Mobile Number is required.".to_string()))?;
        validate_mobile_no(&mobile_no)
            .map_err(|_| AppError::Validation("Invalid Mobile Number.".to_string()))?;

        let country_code = request
            .country_code
            .ok_or_else(|| AppError::Validation("Country Code is required.".to_string()))?;
        validate_country_code(&country_code)
            .map_err(|_| AppError::Validation("Invalid Country Code.".to_string()))?;

        self.otp_limiter.check(&mobile_no).await?;

        let mut tx = self.pool.begin().await?;

        let user = self
            .repository
            .create_in_tx(
                &mut tx,
                request.firstname,
                request.lastname,
                country_code,
                mobile_no,
                ROLE_DRIVER,
            )
            .await?;

        // el commit depende del proveedor: sin OTP no hay registro
        match self.otp.send(&user.phone_no()).await {
            Ok(_) => {
                tx.commit().await?;
                Ok(ApiResponse::message_only("OTP sent successfully".to_string()))
            }
            Err(err) => {
                tx.rollback().await.ok();
                Err(err)
            }
        }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<ApiResponse<()>, AppError> {
        let mobile_no = request
            .mobile_no
            .ok_or_else(|| AppError::Validation("Please enter your mobile number".to_string()))?;

        self.otp_limiter.check(&mobile_no).await?;

        let user = self.find_by_mobile_no(&mobile_no).await?;
        self.otp.send(&user.phone_no()).await?;

        Ok(ApiResponse::message_only("OTP sent successfully".to_string()))
    }

    pub async fn verify_otp(&self, request: VerifyOtpRequest) -> Result<AuthResponse, AppError> {
        let code = request
            .code
            .ok_or_else(|| AppError::Validation("Please send OTP".to_string()))?;

        let mobile_no = request
            .mobile_no
            .ok_or_else(|| AppError::Validation("Mobile Number is required.".to_string()))?;

        let user = self.find_by_mobile_no(&mobile_no).await?;

        let valid = self.otp.verify(&user.phone_no(), &code).await?;
        if !valid {
            return Err(AppError::BadRequest("Invalid / Expired OTP.".to_string()));
        }

        let user = self.repository.mark_verified(user.id).await?;
        let token = generate_token(user.id, &user.role, &self.jwt_config)?;

        Ok(AuthResponse {
            user: user.into(),
            token,
            message: "OTP verified successfully".to_string(),
        })
    }

    pub async fn resend_otp(&self, request: LoginRequest) -> Result<ApiResponse<()>, AppError> {
        let mobile_no = request
            .mobile_no
            .ok_or_else(|| AppError::Validation("Mobile number is required.".to_string()))?;

        self.otp_limiter.check(&mobile_no).await?;

        let user = self.find_by_mobile_no(&mobile_no).await?;
        self.otp.send(&user.phone_no()).await?;

        Ok(ApiResponse::message_only("OTP sent successfully".to_string()))
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<UserResponse, AppError> {
        let user = self
            .repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User Not Found".to_string()))?;

        Ok(user.into())
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        fields: UpdateProfileFields,
        profile_img: Option<UploadFile>,
    ) -> Result<ApiResponse<UserResponse>, AppError> {
        let profile_url = match profile_img {
            Some(file) => Some(self.storage.store(file, PROFILE_DIR).await?),
            None => None,
        };

        let user = self
            .repository
            .update_profile(user_id, fields.firstname, fields.lastname, fields.email, profile_url)
            .await?;

        Ok(ApiResponse::success_with_message(
            user.into(),
            "Profile Updated Successfully.".to_string(),
        ))
    }

    pub async fn delete_account(&self, user_id: Uuid) -> Result<ApiResponse<()>, AppError> {
        self.repository.delete(user_id).await?;
        Ok(ApiResponse::message_only("User Deleted successfully.".to_string()))
    }

    pub async fn check_in(&self, user_id: Uuid) -> Result<UserLogResponse, AppError> {
        let log = self.repository.check_in(user_id).await?;
        Ok(log.into())
    }

    pub async fn check_out(&self, user_id: Uuid) -> Result<UserLogResponse, AppError> {
        let log = self.repository.check_out(user_id).await?;
        Ok(log.into())
    }

    async fn find_by_mobile_no(&self, mobile_no: &str) -> Result<User, AppError> {
        self.repository
            .find_by_mobile_no(mobile_no)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("User with mobile number is not registered.".to_string())
            })
    }
}
