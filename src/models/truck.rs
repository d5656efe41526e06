//! Modelo de Truck

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Truck - mapea exactamente a la tabla trucks.
/// `is_avail` solo lo mutan las transiciones del ciclo de vida de Trip
/// mientras exista un viaje en curso sobre el camión.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Truck {
    pub id: Uuid,
    pub truck_id: String,
    pub plate_no: String,
    pub name: String,
    pub is_avail: bool,
    pub created_at: DateTime<Utc>,
}
