use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::location::Location;
use crate::utils::errors::AppError;

pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, name: String, lat: f64, long: f64) -> Result<Location, AppError> {
        let id = Uuid::new_v4();

        let location = sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO locations (id, name, lat, long, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(lat)
        .bind(long)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_duplicate_name)?;

        Ok(location)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, AppError> {
        let location = sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(location)
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        limit_offset: Option<(i64, i64)>,
    ) -> Result<(Vec<Location>, i64), AppError> {
        let (limit, offset) = limit_offset.unwrap_or((i64::MAX, 0));

        let rows = sqlx::query_as::<_, LocationCountRow>(
            r#"
            SELECT *, COUNT(*) OVER() AS total_count
            FROM locations
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = rows.first().map(|row| row.total_count).unwrap_or(0);
        Ok((rows.into_iter().map(|row| row.location).collect(), total))
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        lat: Option<f64>,
        long: Option<f64>,
    ) -> Result<Location, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Location not found.".to_string()))?;

        let location = sqlx::query_as::<_, Location>(
            r#"
            UPDATE locations
            SET name = $2, lat = $3, long = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name.unwrap_or(current.name))
        .bind(lat.unwrap_or(current.lat))
        .bind(long.unwrap_or(current.long))
        .fetch_one(&self.pool)
        .await
        .map_err(map_duplicate_name)?;

        Ok(location)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Location not found.".to_string()))?;

        sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Violación de unicidad sobre el nombre -> mensaje de dominio
fn map_duplicate_name(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            return AppError::Conflict("Location with this name already exists.".to_string());
        }
    }
    AppError::Database(err)
}

#[derive(sqlx::FromRow)]
struct LocationCountRow {
    #[sqlx(flatten)]
    location: Location,
    total_count: i64,
}
