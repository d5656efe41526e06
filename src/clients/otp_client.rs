//! Cliente del proveedor de OTP (Twilio Verify)
//!
//! Este módulo maneja el envío y la verificación de códigos OTP
//! contra la API REST de Twilio Verify v2.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::environment::EnvironmentConfig;
use crate::utils::errors::AppError;

const VERIFY_BASE_URL: &str = "https://verify.twilio.com/v2/Services";

/// Recibo devuelto por el proveedor al despachar un OTP
#[derive(Debug, Clone, Deserialize)]
pub struct OtpReceipt {
    pub sid: String,
    pub status: String,
}

/// Contrato del gateway de OTP
#[async_trait]
pub trait OtpGateway: Send + Sync {
    /// Enviar un código OTP por SMS al número indicado (formato +<cc><número>)
    async fn send(&self, phone_no: &str) -> Result<OtpReceipt, AppError>;

    /// Verificar un código contra el número; true cuando el código es válido
    async fn verify(&self, phone_no: &str, code: &str) -> Result<bool, AppError>;
}

/// Cliente HTTP del servicio Twilio Verify
#[derive(Clone)]
pub struct OtpClient {
    http_client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    service_sid: String,
}

#[derive(Debug, Deserialize)]
struct VerificationResponse {
    sid: Option<String>,
    status: Option<String>,
}

impl OtpClient {
    pub fn new(http_client: reqwest::Client, config: &EnvironmentConfig) -> Self {
        Self {
            http_client,
            account_sid: config.twilio_account_sid.clone(),
            auth_token: config.twilio_auth_token.clone(),
            service_sid: config.twilio_service_sid.clone(),
        }
    }

    /// Traducir códigos de error conocidos del proveedor a errores de dominio
    fn map_provider_error(code: Option<i64>, message: Option<String>) -> AppError {
        match code {
            Some(60200) => AppError::BadRequest("Invalid Mobile Number or Country Code".to_string()),
            Some(20404) => AppError::BadRequest("Invalid / Expired OTP.".to_string()),
            _ => AppError::Upstream(message.unwrap_or_else(|| "OTP provider error".to_string())),
        }
    }

    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<VerificationResponse, AppError> {
        let response = self
            .http_client
            .post(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(form)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("OTP provider unreachable: {}", e)))?;

        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid OTP provider response: {}", e)))?;

        // en los errores del proveedor `status` viene numérico y trae
        // `code` + `message`
        if !status.is_success() {
            let code = body.get("code").and_then(|c| c.as_i64());
            let message = body
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string);
            log::warn!("OTP provider error {:?}: {:?}", code, message);
            return Err(Self::map_provider_error(code, message));
        }

        serde_json::from_value(body)
            .map_err(|e| AppError::Upstream(format!("Invalid OTP provider response: {}", e)))
    }
}

#[async_trait]
impl OtpGateway for OtpClient {
    async fn send(&self, phone_no: &str) -> Result<OtpReceipt, AppError> {
        let url = format!("{}/{}/Verifications", VERIFY_BASE_URL, self.service_sid);
        let body = self
            .post_form(&url, &[("To", phone_no), ("Channel", "sms")])
            .await?;

        Ok(OtpReceipt {
            sid: body.sid.unwrap_or_default(),
            status: body.status.unwrap_or_default(),
        })
    }

    async fn verify(&self, phone_no: &str, code: &str) -> Result<bool, AppError> {
        let url = format!("{}/{}/VerificationCheck", VERIFY_BASE_URL, self.service_sid);
        let body = self.post_form(&url, &[("To", phone_no), ("Code", code)]).await?;

        Ok(body.status.as_deref() == Some("approved"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_provider_codes_map_to_domain_errors() {
        match OtpClient::map_provider_error(Some(60200), None) {
            AppError::BadRequest(msg) => {
                assert_eq!(msg, "Invalid Mobile Number or Country Code")
            }
            other => panic!("unexpected error: {:?}", other),
        }

        match OtpClient::map_provider_error(Some(20404), None) {
            AppError::BadRequest(msg) => assert_eq!(msg, "Invalid / Expired OTP."),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_provider_code_is_upstream() {
        match OtpClient::map_provider_error(Some(20003), Some("Authenticate".to_string())) {
            AppError::Upstream(msg) => assert_eq!(msg, "Authenticate"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
