//! Modelos de Trip y SubTrip
//!
//! Este módulo contiene las entidades centrales del ciclo de vida de
//! viajes: el viaje principal con su secuencia de conductores y el
//! sub-viaje (segunda entrega) anidado.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

pub const STATUS_ON_GOING: &str = "on-going";
pub const STATUS_COMPLETED: &str = "completed";

/// Una entrada de la secuencia de conductores: quién tomó el volante y cuándo.
/// La secuencia es append-only; los relevos agregan entradas, nunca borran.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriverShift {
    pub d_id: Uuid,
    pub time: DateTime<Utc>,
}

/// Trip - mapea exactamente a la tabla trips
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: Uuid,
    pub descr: String,
    pub truck: Uuid,
    pub source_loc: Uuid,
    pub load_loc: Uuid,
    pub unload_loc: Option<Uuid>,
    pub end_loc: Option<Uuid>,
    pub dispatch: Option<String>,
    pub start_milage: Decimal,
    pub end_milage: Option<Decimal>,
    pub arrival_time: Option<DateTime<Utc>>,
    pub load_time_start: Option<DateTime<Utc>>,
    pub load_time_end: Option<DateTime<Utc>>,
    pub unload_time_start: Option<DateTime<Utc>>,
    pub unload_time_end: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub driver_log: Json<Vec<DriverShift>>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    pub fn is_on_going(&self) -> bool {
        self.status == STATUS_ON_GOING
    }

    /// Conductor actual: la última entrada de la secuencia.
    /// La exclusividad de conductor se evalúa contra esta entrada, no
    /// contra toda la secuencia: quien ya entregó el turno puede abrir
    /// un viaje nuevo.
    pub fn current_driver(&self) -> Option<Uuid> {
        self.driver_log.0.last().map(|shift| shift.d_id)
    }

    /// True si el conductor aparece en cualquier punto de la secuencia
    pub fn has_driver(&self, driver_id: Uuid) -> bool {
        self.driver_log.0.iter().any(|shift| shift.d_id == driver_id)
    }
}

/// SubTrip - segunda entrega anidada bajo un Trip (a lo sumo una por viaje)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubTrip {
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
    pub gross_wt: Option<Decimal>,
    pub tare_wt: Option<Decimal>,
    pub net_wt: Option<Decimal>,
    pub unload_time_start: Option<DateTime<Utc>>,
    pub unload_time_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip_with_drivers(drivers: Vec<Uuid>) -> Trip {
        let shifts = drivers
            .into_iter()
            .map(|d_id| DriverShift { d_id, time: Utc::now() })
            .collect();

        Trip {
            id: Uuid::new_v4(),
            descr: "haul".into(),
            truck: Uuid::new_v4(),
            source_loc: Uuid::new_v4(),
            load_loc: Uuid::new_v4(),
            unload_loc: None,
            end_loc: None,
            dispatch: None,
            start_milage: Decimal::new(100, 0),
            end_milage: None,
            arrival_time: None,
            load_time_start: None,
            load_time_end: None,
            unload_time_start: None,
            unload_time_end: None,
            end_time: None,
            driver_log: Json(shifts),
            status: STATUS_ON_GOING.into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_current_driver_is_last_entry() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let trip = trip_with_drivers(vec![first, second]);

        assert_eq!(trip.current_driver(), Some(second));
        // el primer conductor sigue en la secuencia aunque ya no conduce
        assert!(trip.has_driver(first));
        assert!(trip.has_driver(second));
        assert!(!trip.has_driver(Uuid::new_v4()));
    }

    #[test]
    fn test_empty_driver_log() {
        let trip = trip_with_drivers(vec![]);
        assert_eq!(trip.current_driver(), None);
    }

    #[test]
    fn test_driver_shift_serialization() {
        let shift = DriverShift {
            d_id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap(),
            time: Utc::now(),
        };
        let json = serde_json::to_value(&shift).unwrap();
        assert_eq!(json["d_id"], "550e8400-e29b-41d4-a716-446655440000");
        assert!(json["time"].is_string());
    }
}
