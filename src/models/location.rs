//! Modelo de Location

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Location - dato de referencia inmutable, referenciado por los tramos
/// de Trip y SubTrip.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub lat: f64,
    pub long: f64,
    pub created_at: DateTime<Utc>,
}
