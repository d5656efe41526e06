use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::location_dto::LocationResponse;
use crate::dto::mill_dto::{CreateMillRequest, MillListResponse, MillResponse, UpdateMillRequest};
use crate::dto::{ApiResponse, PageQuery};
use crate::repositories::mill_repository::MillRepository;
use crate::utils::errors::AppError;
use crate::utils::validation::validate_coordinates;

pub struct MillController {
    repository: MillRepository,
}

impl MillController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: MillRepository::new(pool),
        }
    }

    /// El molino y su dirección nacen juntos: la Location se crea en la
    /// misma operación y el molino la referencia
    pub async fn create(
        &self,
        request: CreateMillRequest,
    ) -> Result<ApiResponse<MillResponse>, AppError> {
        let mill_name = request
            .mill_name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Mill name is required.".to_string()))?;

        let address_name = request
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Address name is required.".to_string()))?;

        let lat = request
            .lat
            .ok_or_else(|| AppError::Validation("Latitude is required.".to_string()))?;
        let long = request
            .long
            .ok_or_else(|| AppError::Validation("Longitude is required.".to_string()))?;

        validate_coordinates(lat, long)
            .map_err(|_| AppError::Validation("Invalid coordinates.".to_string()))?;

        let (mill, location) = self
            .repository
            .create_with_address(mill_name, address_name, lat, long)
            .await?;

        Ok(ApiResponse::success_with_message(
            MillResponse::from_parts(mill, Some(location.into())),
            "Molino creado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<MillResponse, AppError> {
        let (mill, address) = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Mill not found.".to_string()))?;

        Ok(MillResponse::from_parts(mill, address.map(LocationResponse::from)))
    }

    pub async fn list(&self, query: &PageQuery) -> Result<MillListResponse, AppError> {
        let (rows, total) = self
            .repository
            .list(query.search.as_deref(), query.limit_offset())
            .await?;

        Ok(MillListResponse {
            mills: rows
                .into_iter()
                .map(|(mill, address)| {
                    MillResponse::from_parts(mill, address.map(LocationResponse::from))
                })
                .collect(),
            mill_count: total,
        })
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateMillRequest,
    ) -> Result<MillResponse, AppError> {
        let mill = self.repository.update(id, request.mill_name).await?;
        let address = self
            .repository
            .find_by_id(mill.id)
            .await?
            .and_then(|(_, address)| address);

        Ok(MillResponse::from_parts(mill, address.map(LocationResponse::from)))
    }

    pub async fn delete(&self, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        self.repository.delete(id).await?;
        Ok(ApiResponse::message_only("Mill Deleted successfully.".to_string()))
    }
}
