//! Modelo de Mill

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Mill - molino destino de las entregas; su dirección es una Location
/// creada en la misma operación.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Mill {
    pub id: Uuid,
    pub mill_name: String,
    pub address: Uuid,
    pub created_at: DateTime<Utc>,
}
