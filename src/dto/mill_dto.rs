use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dto::location_dto::LocationResponse;
use crate::models::mill::Mill;

// Request para crear un molino con su dirección en una sola operación
#[derive(Debug, Deserialize)]
pub struct CreateMillRequest {
    pub mill_name: Option<String>,
    // dirección del molino (se crea una Location nueva)
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub long: Option<f64>,
}

// Request para actualizar un molino
#[derive(Debug, Deserialize)]
pub struct UpdateMillRequest {
    pub mill_name: Option<String>,
}

// Response de molino con su dirección resuelta
#[derive(Debug, Serialize)]
pub struct MillResponse {
    pub id: Uuid,
    pub mill_name: String,
    pub address: Option<LocationResponse>,
    pub created_at: DateTime<Utc>,
}

impl MillResponse {
    pub fn from_parts(mill: Mill, address: Option<LocationResponse>) -> Self {
        Self {
            id: mill.id,
            mill_name: mill.mill_name,
            address,
            created_at: mill.created_at,
        }
    }
}

// Response de listado con total
#[derive(Debug, Serialize)]
pub struct MillListResponse {
    pub mills: Vec<MillResponse>,
    pub mill_count: i64,
}
