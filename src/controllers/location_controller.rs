use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::location_dto::{CreateLocationRequest, LocationListResponse, LocationResponse};
use crate::dto::{ApiResponse, PageQuery};
use crate::repositories::location_repository::LocationRepository;
use crate::utils::errors::AppError;
use crate::utils::validation::validate_coordinates;

pub struct LocationController {
    repository: LocationRepository,
}

impl LocationController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: LocationRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateLocationRequest,
    ) -> Result<ApiResponse<LocationResponse>, AppError> {
        let name = request
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Location name is required.".to_string()))?;

        let lat = request
            .lat
            .ok_or_else(|| AppError::Validation("Latitude is required.".to_string()))?;
        let long = request
            .long
            .ok_or_else(|| AppError::Validation("Longitude is required.".to_string()))?;

        validate_coordinates(lat, long)
            .map_err(|_| AppError::Validation("Invalid coordinates.".to_string()))?;

        let location = self.repository.create(name, lat, long).await?;

        Ok(ApiResponse::success_with_message(
            location.into(),
            "Ubicación creada exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<LocationResponse, AppError> {
        let location = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Location not found.".to_string()))?;

        Ok(location.into())
    }

    pub async fn list(&self, query: &PageQuery) -> Result<LocationListResponse, AppError> {
        let (locations, total) = self
            .repository
            .list(query.search.as_deref(), query.limit_offset())
            .await?;

        Ok(LocationListResponse {
            locations: locations.into_iter().map(LocationResponse::from).collect(),
            location_count: total,
        })
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: CreateLocationRequest,
    ) -> Result<LocationResponse, AppError> {
        if let (Some(lat), Some(long)) = (request.lat, request.long) {
            validate_coordinates(lat, long)
                .map_err(|_| AppError::Validation("Invalid coordinates.".to_string()))?;
        }

        let location = self
            .repository
            .update(id, request.name, request.lat, request.long)
            .await?;

        Ok(location.into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        self.repository.delete(id).await?;
        Ok(ApiResponse::message_only("Location Deleted successfully.".to_string()))
    }
}
