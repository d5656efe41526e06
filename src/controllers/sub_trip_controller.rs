//! Controlador de sub-viajes
//!
//! Los documentos adjuntos se suben al almacenamiento antes del insert;
//! las URLs resultantes quedan en `docs`.

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::clients::{StorageGateway, UploadFile};
use crate::dto::sub_trip_dto::{CreateSubTripRequest, SubTripMilestone, SubTripResponse};
use crate::dto::ApiResponse;
use crate::repositories::sub_trip_repository::{NewSubTrip, SubTripRepository};
use crate::utils::errors::AppError;

const DOCS_DIR: &str = "trip-docs";

pub struct SubTripController {
    repository: SubTripRepository,
    storage: Arc<dyn StorageGateway>,
}

impl SubTripController {
    pub fn new(pool: PgPool, storage: Arc<dyn StorageGateway>) -> Self {
        Self {
            repository: SubTripRepository::new(pool),
            storage,
        }
    }

    pub async fn create(
        &self,
        request: CreateSubTripRequest,
        files: Vec<UploadFile>,
    ) -> Result<ApiResponse<SubTripResponse>, AppError> {
        let trip = request
            .trip
            .ok_or_else(|| AppError::Validation("Trip Reference is required.".to_string()))?;

        let mill_id = request
            .mill_id
            .ok_or_else(|| AppError::Validation("Mill is required for a trip.".to_string()))?;

        let source = request
            .source
            .ok_or_else(|| AppError::Validation("Source is required.".to_string()))?;

        let dest = request
            .dest
            .ok_or_else(|| AppError::Validation("Destination is required.".to_string()))?;

        let slip_id = require_text(request.slip_id, "Slip ID is required.")?;
        let block_name = require_text(request.block_name, "Block Name is required.")?;
        let block_no = require_text(request.block_no, "Block No is required.")?;
        let prod_detail = require_text(request.prod_detail, "Product detail is required.")?;

        // subir los adjuntos primero: si el almacenamiento falla no se
        // crea el sub-viaje
        let docs = if files.is_empty() {
            Vec::new()
        } else {
            self.storage.store_many(files, DOCS_DIR).await?
        };

        let sub_trip = self
            .repository
            .create(NewSubTrip {
                trip,
                mill_id,
                source,
                dest,
                slip_id,
                block_name,
                block_no,
                prod_detail,
                docs,
            })
            .await?;

        Ok(ApiResponse::success_with_message(
            sub_trip.into(),
            "Sub-viaje creado exitosamente".to_string(),
        ))
    }

    pub async fn update(
        &self,
        sub_trip_id: Uuid,
        milestone: SubTripMilestone,
    ) -> Result<SubTripResponse, AppError> {
        let sub_trip = self.repository.apply_milestone(sub_trip_id, milestone).await?;
        Ok(sub_trip.into())
    }

    pub async fn get_by_trip(&self, trip_id: Uuid) -> Result<SubTripResponse, AppError> {
        let sub_trip = self
            .repository
            .find_by_trip(trip_id)
            .await?
            .ok_or_else(|| AppError::NotFound("SubTrip not found.".to_string()))?;

        Ok(sub_trip.into())
    }
}

fn require_text(value: Option<String>, message: &str) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))
}
