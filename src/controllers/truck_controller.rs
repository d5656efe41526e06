use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::truck_dto::{
    CreateTruckRequest, TruckListResponse, TruckResponse, UpdateTruckRequest,
};
use crate::dto::{ApiResponse, PageQuery};
use crate::repositories::truck_repository::TruckRepository;
use crate::utils::errors::AppError;

pub struct TruckController {
    repository: TruckRepository,
}

impl TruckController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: TruckRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateTruckRequest,
    ) -> Result<ApiResponse<TruckResponse>, AppError> {
        let truck_id = require_text(request.truck_id, "Truck ID is required.")?;
        let plate_no = require_text(request.plate_no, "Plate No is required.")?;
        let name = require_text(request.name, "Truck Name is required.")?;

        let truck = self.repository.create(truck_id, plate_no, name).await?;

        Ok(ApiResponse::success_with_message(
            truck.into(),
            "Camión registrado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<TruckResponse, AppError> {
        let truck = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Truck not found.".to_string()))?;

        Ok(truck.into())
    }

    pub async fn list(&self, query: &PageQuery) -> Result<TruckListResponse, AppError> {
        let (trucks, total) = self
            .repository
            .list(query.search.as_deref(), query.limit_offset())
            .await?;

        Ok(TruckListResponse {
            trucks: trucks.into_iter().map(TruckResponse::from).collect(),
            truck_count: total,
        })
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateTruckRequest,
    ) -> Result<TruckResponse, AppError> {
        let truck = self
            .repository
            .update(id, request.truck_id, request.plate_no, request.name)
            .await?;

        Ok(truck.into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        self.repository.delete(id).await?;
        Ok(ApiResponse::message_only("Truck Deleted successfully.".to_string()))
    }
}

fn require_text(value: Option<String>, message: &str) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))
}
