//! Controlador del ciclo de vida de viajes
//!
//! Precondiciones en orden, la primera falla gana:
//! 1. camión presente en el request
//! 2. camión existente y disponible (reclamo atómico)
//! 3. conductor sin otro viaje en curso

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::location_dto::LocationBrief;
use crate::dto::trip_dto::{
    decimal_to_f64, CreateTripRequest, TripHistoryEntry, TripListResponse, TripMilestone,
    TripResponse, TruckBrief,
};
use crate::dto::{ApiResponse, PageQuery};
use crate::repositories::trip_repository::{TripHistoryRow, TripJoinedRow, TripRepository};
use crate::utils::errors::AppError;
use crate::utils::validation::validate_positive;

pub struct TripController {
    repository: TripRepository,
}

impl TripController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: TripRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        driver_id: Uuid,
        request: CreateTripRequest,
    ) -> Result<ApiResponse<TripResponse>, AppError> {
        let truck = request
            .truck
            .ok_or_else(|| AppError::Validation("Truck is required for a trip.".to_string()))?;

        let desc = request
            .desc
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Trip description is required.".to_string()))?;

        if desc.chars().count() > 250 {
            return Err(AppError::Validation(
                "Trip Description should have maximum 250 characters".to_string(),
            ));
        }

        let source_loc = request
            .source_loc
            .ok_or_else(|| AppError::Validation("Source is required.".to_string()))?;

        let load_loc = request
            .load_loc
            .ok_or_else(|| AppError::Validation("Load location is required.".to_string()))?;

        let start_milage = request
            .start_milage
            .ok_or_else(|| AppError::Validation("Start Milage is Required.".to_string()))?;

        validate_positive(start_milage)
            .map_err(|_| AppError::Validation("Start Milage must be positive.".to_string()))?;

        let start_milage = Decimal::from_f64_retain(start_milage)
            .ok_or_else(|| AppError::Validation("Invalid mileage value".to_string()))?;

        let trip = self
            .repository
            .create(driver_id, desc, truck, source_loc, load_loc, request.dispatch, start_milage)
            .await?;

        let response = self.joined_response(trip.id).await?;

        Ok(ApiResponse::success_with_message(
            response,
            "Viaje creado exitosamente".to_string(),
        ))
    }

    /// Sin id: el viaje en curso del conductor. Con id: ese viaje sin
    /// importar su estado (para revisar un viaje pasado en el que participó).
    pub async fn current(
        &self,
        driver_id: Uuid,
        trip_id: Option<Uuid>,
    ) -> Result<TripResponse, AppError> {
        let row = match trip_id {
            Some(id) => self
                .repository
                .find_joined_by_id(id)
                .await?
                .ok_or_else(|| AppError::NotFound("Trip not found.".to_string()))?,
            None => self
                .repository
                .find_on_going_by_driver(driver_id)
                .await?
                .ok_or_else(|| AppError::NotFound("No On-going trip".to_string()))?,
        };

        Ok(joined_to_response(row))
    }

    pub async fn shift_change(
        &self,
        trip_id: Uuid,
        driver_id: Uuid,
    ) -> Result<ApiResponse<TripResponse>, AppError> {
        let trip = self.repository.shift_change(trip_id, driver_id).await?;
        let response = self.joined_response(trip.id).await?;

        Ok(ApiResponse::success_with_message(
            response,
            "Relevo de conductor registrado".to_string(),
        ))
    }

    pub async fn update(
        &self,
        trip_id: Uuid,
        milestone: TripMilestone,
    ) -> Result<TripResponse, AppError> {
        let trip = self.repository.apply_milestone(trip_id, milestone).await?;
        self.joined_response(trip.id).await
    }

    pub async fn history(&self, driver_id: Uuid) -> Result<Vec<TripHistoryEntry>, AppError> {
        let rows = self.repository.history_by_driver(driver_id).await?;
        Ok(rows.into_iter().map(history_to_entry).collect())
    }

    pub async fn list(&self, query: &PageQuery) -> Result<TripListResponse, AppError> {
        let (rows, total) = self
            .repository
            .list(query.status.as_deref(), query.limit_offset())
            .await?;

        Ok(TripListResponse {
            trips: rows.into_iter().map(joined_to_response).collect(),
            trip_count: total,
        })
    }

    pub async fn delete(&self, trip_id: Uuid) -> Result<ApiResponse<()>, AppError> {
        self.repository.delete(trip_id).await?;
        Ok(ApiResponse::message_only("Trip Deleted successfully.".to_string()))
    }

    async fn joined_response(&self, trip_id: Uuid) -> Result<TripResponse, AppError> {
        let row = self
            .repository
            .find_joined_by_id(trip_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Trip not found.".to_string()))?;

        Ok(joined_to_response(row))
    }
}

fn location_brief(
    id: Option<Uuid>,
    name: Option<String>,
    lat: Option<f64>,
    long: Option<f64>,
) -> Option<LocationBrief> {
    match (id, name, lat, long) {
        (Some(id), Some(name), Some(lat), Some(long)) => {
            Some(LocationBrief { id, name, lat, long })
        }
        _ => None,
    }
}

fn joined_to_response(row: TripJoinedRow) -> TripResponse {
    let trip = row.trip;

    let truck = match (row.truck_pk, row.truck_code, row.truck_plate, row.truck_name) {
        (Some(id), Some(truck_id), Some(plate_no), Some(name)) => {
            Some(TruckBrief { id, truck_id, plate_no, name })
        }
        _ => None,
    };

    TripResponse {
        id: trip.id,
        desc: trip.descr,
        dispatch: trip.dispatch,
        status: trip.status,
        start_milage: decimal_to_f64(&trip.start_milage),
        end_milage: trip.end_milage.as_ref().map(decimal_to_f64),
        driver: trip.driver_log.0,
        truck,
        source_loc: location_brief(row.source_id, row.source_name, row.source_lat, row.source_long),
        load_loc: location_brief(row.load_id, row.load_name, row.load_lat, row.load_long),
        unload_loc: location_brief(row.unload_id, row.unload_name, row.unload_lat, row.unload_long),
        end_loc: location_brief(row.end_id, row.end_name, row.end_lat, row.end_long),
        arrival_time: trip.arrival_time,
        load_time_start: trip.load_time_start,
        load_time_end: trip.load_time_end,
        unload_time_start: trip.unload_time_start,
        unload_time_end: trip.unload_time_end,
        end_time: trip.end_time,
        created_at: trip.created_at,
    }
}

fn history_to_entry(row: TripHistoryRow) -> TripHistoryEntry {
    TripHistoryEntry {
        id: row.id,
        desc: row.descr,
        status: row.status,
        start_milage: decimal_to_f64(&row.start_milage),
        end_milage: row.end_milage.as_ref().map(decimal_to_f64),
        end_time: row.end_time,
        source_loc: location_brief(row.source_id, row.source_name, row.source_lat, row.source_long),
        sub_trip_id: row.sub_trip_id,
        sub_trip_dest: location_brief(
            row.sub_dest_id,
            row.sub_dest_name,
            row.sub_dest_lat,
            row.sub_dest_long,
        ),
        sub_trip_net_wt: row.sub_trip_net_wt.as_ref().map(decimal_to_f64),
        created_at: row.created_at,
    }
}
