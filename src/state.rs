//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use reqwest::Client;
use sqlx::PgPool;

use crate::clients::{OtpClient, OtpGateway, StorageClient, StorageGateway};
use crate::config::environment::EnvironmentConfig;
use crate::middleware::rate_limit::OtpRateLimiter;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub http_client: Client,
    pub otp: Arc<dyn OtpGateway>,
    pub storage: Arc<dyn StorageGateway>,
    pub otp_limiter: OtpRateLimiter,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let http_client = Client::new();
        let otp: Arc<dyn OtpGateway> = Arc::new(OtpClient::new(http_client.clone(), &config));
        let storage: Arc<dyn StorageGateway> =
            Arc::new(StorageClient::new(http_client.clone(), &config));
        let otp_limiter = OtpRateLimiter::new(&config);

        Self {
            pool,
            config,
            http_client,
            otp,
            storage,
            otp_limiter,
        }
    }

    /// Variante para tests: permite inyectar gateways stub
    pub fn with_gateways(
        pool: PgPool,
        config: EnvironmentConfig,
        otp: Arc<dyn OtpGateway>,
        storage: Arc<dyn StorageGateway>,
    ) -> Self {
        let otp_limiter = OtpRateLimiter::new(&config);

        Self {
            pool,
            config,
            http_client: Client::new(),
            otp,
            storage,
            otp_limiter,
        }
    }
}
