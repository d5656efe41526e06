use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dto::trip_dto::decimal_to_f64;
use crate::models::trip::SubTrip;

// Campos de texto del multipart de creación de sub-viaje;
// los documentos llegan como archivos en el mismo form
#[derive(Debug, Default, Deserialize)]
pub struct CreateSubTripRequest {
    pub trip: Option<Uuid>,
    pub mill_id: Option<Uuid>,
    pub source: Option<Uuid>,
    pub dest: Option<Uuid>,
    pub slip_id: Option<String>,
    pub block_name: Option<String>,
    pub block_no: Option<String>,
    pub prod_detail: Option<String>,
}

/// Hito de un sub-viaje. WEIGHTS copia los tres pesos del pesaje y no es
/// terminal: el cierre del viaje padre es independiente y explícito.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "milestone")]
pub enum SubTripMilestone {
    #[serde(rename = "ARRIVAL_TIME")]
    Arrival,
    #[serde(rename = "UNLOAD_TIME_START")]
    UnloadStart,
    #[serde(rename = "UNLOAD_TIME_END")]
    UnloadEnd,
    #[serde(rename = "WEIGHTS")]
    Weights { gross_wt: f64, tare_wt: f64, net_wt: f64 },
}

// Response de sub-viaje
#[derive(Debug, Serialize)]
pub struct SubTripResponse {
    pub id: Uuid,
    pub trip: Uuid,
    pub mill_id: Uuid,
    pub source: Uuid,
    pub dest: Uuid,
    pub slip_id: String,
    pub block_name: String,
    pub block_no: String,
    pub prod_detail: String,
    pub docs: Vec<String>,
    pub arrival_time: Option<DateTime<Utc>>,
    pub gross_wt: Option<f64>,
    pub tare_wt: Option<f64>,
    pub net_wt: Option<f64>,
    pub unload_time_start: Option<DateTime<Utc>>,
    pub unload_time_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<SubTrip> for SubTripResponse {
    fn from(sub_trip: SubTrip) -> Self {
        Self {
            id: sub_trip.id,
            trip: sub_trip.trip,
            mill_id: sub_trip.mill_id,
            source: sub_trip.source,
            dest: sub_trip.dest,
            slip_id: sub_trip.slip_id,
            block_name: sub_trip.block_name,
            block_no: sub_trip.block_no,
            prod_detail: sub_trip.prod_detail,
            docs: sub_trip.docs,
            arrival_time: sub_trip.arrival_time,
            gross_wt: sub_trip.gross_wt.as_ref().map(decimal_to_f64),
            tare_wt: sub_trip.tare_wt.as_ref().map(decimal_to_f64),
            net_wt: sub_trip.net_wt.as_ref().map(decimal_to_f64),
            unload_time_start: sub_trip.unload_time_start,
            unload_time_end: sub_trip.unload_time_end,
            created_at: sub_trip.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_weights_milestone() {
        let milestone: SubTripMilestone = serde_json::from_value(json!({
            "milestone": "WEIGHTS",
            "gross_wt": 12000.0,
            "tare_wt": 4000.0,
            "net_wt": 8000.0
        }))
        .unwrap();
        assert_eq!(
            milestone,
            SubTripMilestone::Weights { gross_wt: 12000.0, tare_wt: 4000.0, net_wt: 8000.0 }
        );
    }

    #[test]
    fn test_trip_only_milestones_rejected() {
        // LOAD_TIME_START pertenece al viaje padre, no al sub-viaje
        let invalid =
            serde_json::from_value::<SubTripMilestone>(json!({ "milestone": "LOAD_TIME_START" }));
        assert!(invalid.is_err());
    }
}
