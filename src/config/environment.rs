//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub otp_rate_limit_sends: u32,
    pub otp_rate_limit_window: u64,
    // Credenciales del proveedor de OTP (Twilio Verify)
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_service_sid: String,
    // Almacenamiento de objetos (compatible S3)
    pub storage_endpoint: String,
    pub storage_bucket: String,
    pub storage_public_url: Option<String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").expect("ENVIRONMENT must be set"),
            port: env::var("PORT")
                .expect("PORT must be set")
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").expect("HOST must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            jwt_expiration: env::var("JWT_EXPIRATION")
                .expect("JWT_EXPIRATION must be set")
                .parse()
                .expect("JWT_EXPIRATION must be a valid number"),
            cors_origins: env::var("CORS_ORIGINS")
                .expect("CORS_ORIGINS must be set")
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            otp_rate_limit_sends: env::var("OTP_RATE_LIMIT_SENDS")
                .expect("OTP_RATE_LIMIT_SENDS must be set")
                .parse()
                .expect("OTP_RATE_LIMIT_SENDS must be a valid number"),
            otp_rate_limit_window: env::var("OTP_RATE_LIMIT_WINDOW")
                .expect("OTP_RATE_LIMIT_WINDOW must be set")
                .parse()
                .expect("OTP_RATE_LIMIT_WINDOW must be a valid number"),
            twilio_account_sid: env::var("TWILIO_ACCOUNT_SID")
                .expect("TWILIO_ACCOUNT_SID must be set"),
            twilio_auth_token: env::var("TWILIO_AUTH_TOKEN")
                .expect("TWILIO_AUTH_TOKEN must be set"),
            twilio_service_sid: env::var("TWILIO_SERVICE_SID")
                .expect("TWILIO_SERVICE_SID must be set"),
            storage_endpoint: env::var("STORAGE_ENDPOINT").expect("STORAGE_ENDPOINT must be set"),
            storage_bucket: env::var("STORAGE_BUCKET").expect("STORAGE_BUCKET must be set"),
            storage_public_url: env::var("STORAGE_PUBLIC_URL").ok(),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
