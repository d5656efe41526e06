use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::truck::Truck;

// Request para registrar un camión
#[derive(Debug, Deserialize)]
pub struct CreateTruckRequest {
    pub truck_id: Option<String>,
    pub plate_no: Option<String>,
    pub name: Option<String>,
}

// Request para actualizar un camión.
// `is_avail` no es editable por el cliente: lo gobierna el ciclo de vida
// de los viajes.
#[derive(Debug, Deserialize)]
pub struct UpdateTruckRequest {
    pub truck_id: Option<String>,
    pub plate_no: Option<String>,
    pub name: Option<String>,
}

// Response de camión
#[derive(Debug, Serialize)]
pub struct TruckResponse {
    pub id: Uuid,
    pub truck_id: String,
    pub plate_no: String,
    pub name: String,
    pub is_avail: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Truck> for TruckResponse {
    fn from(truck: Truck) -> Self {
        Self {
            id: truck.id,
            truck_id: truck.truck_id,
            plate_no: truck.plate_no,
            name: truck.name,
            is_avail: truck.is_avail,
            created_at: truck.created_at,
        }
    }
}

// Response de listado con total
#[derive(Debug, Serialize)]
pub struct TruckListResponse {
    pub trucks: Vec<TruckResponse>,
    pub truck_count: i64,
}
