//! DTOs del ciclo de vida de viajes
//!
//! El update de un viaje viaja con un discriminador explícito: cada hito
//! es una variante etiquetada y los discriminadores desconocidos se
//! rechazan en la deserialización (no existe rama por defecto).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dto::location_dto::LocationBrief;
use crate::models::trip::DriverShift;

// Request para crear un viaje
#[derive(Debug, Deserialize)]
pub struct CreateTripRequest {
    pub desc: Option<String>,
    pub truck: Option<Uuid>,
    pub source_loc: Option<Uuid>,
    pub load_loc: Option<Uuid>,
    pub dispatch: Option<String>,
    pub start_milage: Option<f64>,
}

// Lookup del viaje actual: sin id busca el viaje en curso del conductor,
// con id trae ese viaje sin importar su estado
#[derive(Debug, Deserialize)]
pub struct CurrentTripQuery {
    pub id: Option<Uuid>,
}

/// Hito de un viaje. El discriminador `milestone` selecciona la variante;
/// COMPLETE es la única transición terminal y exige el kilometraje final.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "milestone")]
pub enum TripMilestone {
    #[serde(rename = "ARRIVAL_TIME")]
    Arrival,
    #[serde(rename = "LOAD_TIME_START")]
    LoadStart,
    #[serde(rename = "LOAD_TIME_END")]
    LoadEnd,
    #[serde(rename = "UNLOAD_TIME_START")]
    UnloadStart { unload_loc: Option<Uuid> },
    #[serde(rename = "UNLOAD_TIME_END")]
    UnloadEnd,
    #[serde(rename = "COMPLETE")]
    Complete { end_milage: f64, end_loc: Option<Uuid> },
}

// Referencia resuelta de camión dentro de un viaje
#[derive(Debug, Serialize)]
pub struct TruckBrief {
    pub id: Uuid,
    pub truck_id: String,
    pub plate_no: String,
    pub name: String,
}

// Response de viaje con referencias resueltas para presentación
#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub id: Uuid,
    pub desc: String,
    pub dispatch: Option<String>,
    pub status: String,
    pub start_milage: f64,
    pub end_milage: Option<f64>,
    pub driver: Vec<DriverShift>,
    pub truck: Option<TruckBrief>,
    pub source_loc: Option<LocationBrief>,
    pub load_loc: Option<LocationBrief>,
    pub unload_loc: Option<LocationBrief>,
    pub end_loc: Option<LocationBrief>,
    pub arrival_time: Option<DateTime<Utc>>,
    pub load_time_start: Option<DateTime<Utc>>,
    pub load_time_end: Option<DateTime<Utc>>,
    pub unload_time_start: Option<DateTime<Utc>>,
    pub unload_time_end: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// Response de listado paginado (admin)
#[derive(Debug, Serialize)]
pub struct TripListResponse {
    pub trips: Vec<TripResponse>,
    pub trip_count: i64,
}

// Entrada del historial de viajes completados de un conductor
#[derive(Debug, Serialize)]
pub struct TripHistoryEntry {
    pub id: Uuid,
    pub desc: String,
    pub status: String,
    pub start_milage: f64,
    pub end_milage: Option<f64>,
    pub end_time: Option<DateTime<Utc>>,
    pub source_loc: Option<LocationBrief>,
    // presentes solo cuando el viaje tuvo una segunda entrega
    pub sub_trip_id: Option<Uuid>,
    pub sub_trip_dest: Option<LocationBrief>,
    pub sub_trip_net_wt: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Conversión al estilo de presentación: los Decimal de kilometraje
/// bajan a f64 para el cliente
pub fn decimal_to_f64(value: &Decimal) -> f64 {
    value.to_string().parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_milestone_arrival() {
        let milestone: TripMilestone =
            serde_json::from_value(json!({ "milestone": "ARRIVAL_TIME" })).unwrap();
        assert_eq!(milestone, TripMilestone::Arrival);
    }

    #[test]
    fn test_milestone_complete_requires_end_milage() {
        let milestone: TripMilestone = serde_json::from_value(json!({
            "milestone": "COMPLETE",
            "end_milage": 250.0
        }))
        .unwrap();
        assert_eq!(
            milestone,
            TripMilestone::Complete { end_milage: 250.0, end_loc: None }
        );

        // sin kilometraje final no hay transición terminal
        let missing = serde_json::from_value::<TripMilestone>(json!({ "milestone": "COMPLETE" }));
        assert!(missing.is_err());
    }

    #[test]
    fn test_unknown_milestone_rejected() {
        // un discriminador desconocido no puede caer en COMPLETE
        let unknown = serde_json::from_value::<TripMilestone>(json!({ "milestone": "FINISH" }));
        assert!(unknown.is_err());

        let absent = serde_json::from_value::<TripMilestone>(json!({ "end_milage": 250.0 }));
        assert!(absent.is_err());
    }

    #[test]
    fn test_unload_start_carries_optional_location() {
        let with_loc: TripMilestone = serde_json::from_value(json!({
            "milestone": "UNLOAD_TIME_START",
            "unload_loc": "550e8400-e29b-41d4-a716-446655440000"
        }))
        .unwrap();
        match with_loc {
            TripMilestone::UnloadStart { unload_loc } => assert!(unload_loc.is_some()),
            _ => panic!("expected UnloadStart"),
        }

        let without: TripMilestone =
            serde_json::from_value(json!({ "milestone": "UNLOAD_TIME_START" })).unwrap();
        assert_eq!(without, TripMilestone::UnloadStart { unload_loc: None });
    }

    #[test]
    fn test_decimal_to_f64() {
        assert_eq!(decimal_to_f64(&Decimal::new(2505, 1)), 250.5);
    }
}
