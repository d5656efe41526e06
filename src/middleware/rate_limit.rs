//! Límite de envíos de OTP
//!
//! Este módulo limita los despachos de OTP por número de móvil dentro de
//! una ventana de tiempo, para frenar el abuso de SMS en registro,
//! login y reenvío.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::config::EnvironmentConfig;
use crate::utils::errors::AppError;

/// Conteo de envíos dentro de la ventana vigente para un número
#[derive(Debug, Clone)]
struct SendWindow {
    sends: u32,
    window_start: Instant,
}

/// Estado del límite de OTP por número de móvil
#[derive(Clone)]
pub struct OtpRateLimiter {
    sends: Arc<RwLock<HashMap<String, SendWindow>>>,
    max_sends: u32,
    window_duration: Duration,
}

impl OtpRateLimiter {
    pub fn new(config: &EnvironmentConfig) -> Self {
        Self {
            sends: Arc::new(RwLock::new(HashMap::new())),
            max_sends: config.otp_rate_limit_sends,
            window_duration: Duration::from_secs(config.otp_rate_limit_window),
        }
    }

    /// Registrar un intento de envío para el número; falla con 429 cuando
    /// la ventana vigente ya agotó sus envíos
    pub async fn check(&self, mobile_no: &str) -> Result<(), AppError> {
        let mut sends = self.sends.write().await;
        let now = Instant::now();

        // limpiar ventanas expiradas
        sends.retain(|_, window| now.duration_since(window.window_start) < self.window_duration);

        let window = sends.entry(mobile_no.to_string()).or_insert(SendWindow {
            sends: 0,
            window_start: now,
        });

        if now.duration_since(window.window_start) >= self.window_duration {
            window.sends = 1;
            window.window_start = now;
            return Ok(());
        }

        if window.sends >= self.max_sends {
            log::warn!("OTP rate limit alcanzado para {}", mobile_no);
            return Err(AppError::RateLimitExceeded);
        }

        window.sends += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_sends: u32, window_secs: u64) -> OtpRateLimiter {
        OtpRateLimiter {
            sends: Arc::new(RwLock::new(HashMap::new())),
            max_sends,
            window_duration: Duration::from_secs(window_secs),
        }
    }

    #[tokio::test]
    async fn test_allows_up_to_max_sends() {
        let limiter = limiter(3, 60);

        for _ in 0..3 {
            assert!(limiter.check("9876543210").await.is_ok());
        }
        assert!(limiter.check("9876543210").await.is_err());
    }

    #[tokio::test]
    async fn test_numbers_are_independent() {
        let limiter = limiter(1, 60);

        assert!(limiter.check("9876543210").await.is_ok());
        assert!(limiter.check("9876543210").await.is_err());
        assert!(limiter.check("9123456780").await.is_ok());
    }
}
