//! Modelo de User
//!
//! Este módulo contiene el struct User que mapea a la tabla users,
//! junto con los roles del sistema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const ROLE_DRIVER: &str = "driver";
pub const ROLE_SALE_PERSON: &str = "sale-person";
pub const ROLE_ADMIN: &str = "admin";

/// User - mapea exactamente a la tabla users
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub country_code: String,
    pub mobile_no: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub role: String,
    pub profile_url: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Número completo en formato E.164 para el proveedor de OTP
    pub fn phone_no(&self) -> String {
        format!("+{}{}", self.country_code, self.mobile_no)
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Registro de check-in / check-out de un conductor
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_no_format() {
        let user = User {
            id: Uuid::new_v4(),
            firstname: "Ravi".into(),
            lastname: "Kumar".into(),
            country_code: "91".into(),
            mobile_no: "9876543210".into(),
            email: None,
            password_hash: None,
            role: ROLE_DRIVER.into(),
            profile_url: None,
            verified: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(user.phone_no(), "+919876543210");
        assert!(!user.is_admin());
    }
}
