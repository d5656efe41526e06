use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::location::Location;

// Request para crear una ubicación
#[derive(Debug, Deserialize)]
pub struct CreateLocationRequest {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub long: Option<f64>,
}

// Response de ubicación
#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub id: Uuid,
    pub name: String,
    pub lat: f64,
    pub long: f64,
    pub created_at: DateTime<Utc>,
}

impl From<Location> for LocationResponse {
    fn from(location: Location) -> Self {
        Self {
            id: location.id,
            name: location.name,
            lat: location.lat,
            long: location.long,
            created_at: location.created_at,
        }
    }
}

// Referencia resuelta de ubicación dentro de un viaje
#[derive(Debug, Serialize)]
pub struct LocationBrief {
    pub id: Uuid,
    pub name: String,
    pub lat: f64,
    pub long: f64,
}

// Response de listado con total
#[derive(Debug, Serialize)]
pub struct LocationListResponse {
    pub locations: Vec<LocationResponse>,
    pub location_count: i64,
}
