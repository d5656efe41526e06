use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::trip::STATUS_ON_GOING;
use crate::models::truck::Truck;
use crate::utils::errors::AppError;

pub struct TruckRepository {
    pool: PgPool,
}

impl TruckRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        truck_id: String,
        plate_no: String,
        name: String,
    ) -> Result<Truck, AppError> {
        let id = Uuid::new_v4();

        let truck = sqlx::query_as::<_, Truck>(
            r#"
            INSERT INTO trucks (id, truck_id, plate_no, name, is_avail, created_at)
            VALUES ($1, $2, $3, $4, TRUE, $5)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(truck_id)
        .bind(plate_no)
        .bind(name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(truck)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Truck>, AppError> {
        let truck = sqlx::query_as::<_, Truck>("SELECT * FROM trucks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(truck)
    }

    /// Listado con búsqueda por truck_id y total combinado en la misma query
    pub async fn list(
        &self,
        search: Option<&str>,
        limit_offset: Option<(i64, i64)>,
    ) -> Result<(Vec<Truck>, i64), AppError> {
        let (limit, offset) = limit_offset.unwrap_or((i64::MAX, 0));

        let rows = sqlx::query_as::<_, TruckCountRow>(
            r#"
            SELECT *, COUNT(*) OVER() AS total_count
            FROM trucks
            WHERE ($1::text IS NULL OR truck_id ILIKE '%' || $1 || '%')
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
        Ok((rows.into_iter().map(|row| row.truck).collect(), total))
    }

    /// No es editable `is_avail`: lo gobierna el ciclo de vida de los viajes
    pub async fn update(
        &self,
        id: Uuid,
        truck_id: Option<String>,
        plate_no: Option<String>,
        name: Option<String>,
    ) -> Result<Truck, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Truck not found.".to_string()))?;

        let truck = sqlx::query_as::<_, Truck>(
            r#"
            UPDATE trucks
            SET truck_id = $2, plate_no = $3, name = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(truck_id.unwrap_or(current.truck_id))
        .bind(plate_no.unwrap_or(current.plate_no))
        .bind(name.unwrap_or(current.name))
        .fetch_one(&self.pool)
        .await?;

        Ok(truck)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Truck not found.".to_string()))?;

        // un camión con viaje en curso no puede salir de la flota
        let (in_use,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM trips WHERE truck = $1 AND status = $2)",
        )
        .bind(id)
        .bind(STATUS_ON_GOING)
        .fetch_one(&self.pool)
        .await?;

        if in_use {
            return Err(AppError::Conflict("Truck has an on-going trip.".to_string()));
        }

        sqlx::query("DELETE FROM trucks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct TruckCountRow {
    #[sqlx(flatten)]
    truck: Truck,
    total_count: i64,
}
