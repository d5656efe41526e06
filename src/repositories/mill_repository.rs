use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::location::Location;
use crate::models::mill::Mill;
use crate::utils::errors::AppError;

pub struct MillRepository {
    pool: PgPool,
}

impl MillRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crear el molino y su dirección en la misma transacción
    pub async fn create_with_address(
        &self,
        mill_name: String,
        address_name: String,
        lat: f64,
        long: f64,
    ) -> Result<(Mill, Location), AppError> {
        let mut tx = self.pool.begin().await?;

        let location = sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO locations (id, name, lat, long, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(address_name)
        .bind(lat)
        .bind(long)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        let mill = sqlx::query_as::<_, Mill>(
            r#"
            INSERT INTO mills (id, mill_name, address, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(mill_name)
        .bind(location.id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((mill, location))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<(Mill, Option<Location>)>, AppError> {
        let row = sqlx::query_as::<_, MillJoinedRow>(
            r#"
            SELECT m.*, l.id AS addr_id, l.name AS addr_name, l.lat AS addr_lat,
                   l.long AS addr_long, l.created_at AS addr_created_at
            FROM mills m
            LEFT JOIN locations l ON l.id = m.address
            WHERE m.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(MillJoinedRow::into_parts))
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        limit_offset: Option<(i64, i64)>,
    ) -> Result<(Vec<(Mill, Option<Location>)>, i64), AppError> {
        let (limit, offset) = limit_offset.unwrap_or((i64::MAX, 0));

        let rows = sqlx::query_as::<_, MillListRow>(
            r#"
            SELECT m.*, l.id AS addr_id, l.name AS addr_name, l.lat AS addr_lat,
                   l.long AS addr_long, l.created_at AS addr_created_at,
                   COUNT(*) OVER() AS total_count
            FROM mills m
            LEFT JOIN locations l ON l.id = m.address
            WHERE ($1::text IS NULL OR m.mill_name ILIKE '%' || $1 || '%')
            ORDER BY m.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = rows.first().map(|row| row.total_count).unwrap_or(0);
        Ok((rows.into_iter().map(|row| row.joined.into_parts()).collect(), total))
    }

    pub async fn update(&self, id: Uuid, mill_name: Option<String>) -> Result<Mill, AppError> {
        let mill = sqlx::query_as::<_, Mill>(
            r#"
            UPDATE mills
            SET mill_name = COALESCE($2, mill_name)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(mill_name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Mill not found.".to_string()))?;

        Ok(mill)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM mills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(AppError::NotFound("Mill not found.".to_string()));
        }

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct MillJoinedRow {
    #[sqlx(flatten)]
    mill: Mill,
    addr_id: Option<Uuid>,
    addr_name: Option<String>,
    addr_lat: Option<f64>,
    addr_long: Option<f64>,
    addr_created_at: Option<chrono::DateTime<Utc>>,
}

impl MillJoinedRow {
    fn into_parts(self) -> (Mill, Option<Location>) {
        let address = match (self.addr_id, self.addr_name, self.addr_lat, self.addr_long, self.addr_created_at) {
            (Some(id), Some(name), Some(lat), Some(long), Some(created_at)) => {
                Some(Location { id, name, lat, long, created_at })
            }
            _ => None,
        };
        (self.mill, address)
    }
}

#[derive(sqlx::FromRow)]
struct MillListRow {
    #[sqlx(flatten)]
    joined: MillJoinedRow,
    total_count: i64,
}
