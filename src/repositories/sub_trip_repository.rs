//! Persistencia de sub-viajes (segunda entrega)
//!
//! La cardinalidad "a lo sumo un sub-viaje por viaje" está respaldada por
//! un índice único sobre sub_trips.trip: el chequeo previo da el mensaje
//! de dominio y el índice cierra la ventana de carrera.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::sub_trip_dto::SubTripMilestone;
use crate::models::trip::SubTrip;
use crate::utils::errors::AppError;

pub struct SubTripRepository {
    pool: PgPool,
}

pub struct NewSubTrip {
    pub trip: Uuid,
    pub mill_id: Uuid,
    pub source: Uuid,
    pub dest: Uuid,
    pub slip_id: String,
    pub block_name: String,
    pub block_no: String,
    pub prod_detail: String,
    pub docs: Vec<String>,
}

impl SubTripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_sub_trip: NewSubTrip) -> Result<SubTrip, AppError> {
        let mut tx = self.pool.begin().await?;

        let (parent_exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM trips WHERE id = $1)")
                .bind(new_sub_trip.trip)
                .fetch_one(&mut *tx)
                .await?;

        if !parent_exists {
            return Err(AppError::NotFound("Trip not found.".to_string()));
        }

        let (already_started,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM sub_trips WHERE trip = $1)")
                .bind(new_sub_trip.trip)
                .fetch_one(&mut *tx)
                .await?;

        if already_started {
            return Err(AppError::Conflict("Trip already started.".to_string()));
        }

        let sub_trip = sqlx::query_as::<_, SubTrip>(
            r#"
            INSERT INTO sub_trips (id, trip, mill_id, source, dest, slip_id, block_name,
                                   block_no, prod_detail, docs, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_sub_trip.trip)
        .bind(new_sub_trip.mill_id)
        .bind(new_sub_trip.source)
        .bind(new_sub_trip.dest)
        .bind(new_sub_trip.slip_id)
        .bind(new_sub_trip.block_name)
        .bind(new_sub_trip.block_no)
        .bind(new_sub_trip.prod_detail)
        .bind(new_sub_trip.docs)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_duplicate_sub_trip)?;

        tx.commit().await?;
        Ok(sub_trip)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<SubTrip>, AppError> {
        let sub_trip = sqlx::query_as::<_, SubTrip>("SELECT * FROM sub_trips WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sub_trip)
    }

    pub async fn find_by_trip(&self, trip_id: Uuid) -> Result<Option<SubTrip>, AppError> {
        let sub_trip = sqlx::query_as::<_, SubTrip>("SELECT * FROM sub_trips WHERE trip = $1")
            .bind(trip_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sub_trip)
    }

    /// Aplicar un hito de sub-viaje. La rama WEIGHTS copia los tres pesos
    /// y no es terminal: el cierre del viaje padre es independiente.
    pub async fn apply_milestone(
        &self,
        sub_trip_id: Uuid,
        milestone: SubTripMilestone,
    ) -> Result<SubTrip, AppError> {
        let sub_trip = match milestone {
            SubTripMilestone::Arrival => self.stamp(sub_trip_id, "arrival_time").await?,
            SubTripMilestone::UnloadStart => self.stamp(sub_trip_id, "unload_time_start").await?,
            SubTripMilestone::UnloadEnd => self.stamp(sub_trip_id, "unload_time_end").await?,
            SubTripMilestone::Weights { gross_wt, tare_wt, net_wt } => {
                let gross_wt = to_decimal(gross_wt)?;
                let tare_wt = to_decimal(tare_wt)?;
                let net_wt = to_decimal(net_wt)?;

                sqlx::query_as::<_, SubTrip>(
                    r#"
                    UPDATE sub_trips
                    SET gross_wt = $2, tare_wt = $3, net_wt = $4
                    WHERE id = $1
                    RETURNING *
                    "#,
                )
                .bind(sub_trip_id)
                .bind(gross_wt)
                .bind(tare_wt)
                .bind(net_wt)
                .fetch_optional(&self.pool)
                .await?
            }
        };

        sub_trip.ok_or_else(|| AppError::NotFound("SubTrip not found.".to_string()))
    }

    async fn stamp(&self, sub_trip_id: Uuid, column: &str) -> Result<Option<SubTrip>, AppError> {
        let query = format!("UPDATE sub_trips SET {} = $2 WHERE id = $1 RETURNING *", column);

        let sub_trip = sqlx::query_as::<_, SubTrip>(&query)
            .bind(sub_trip_id)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;

        Ok(sub_trip)
    }
}

fn to_decimal(value: f64) -> Result<Decimal, AppError> {
    Decimal::from_f64_retain(value)
        .ok_or_else(|| AppError::Validation("Invalid weight value".to_string()))
}

/// El índice único sobre trip convierte la carrera de doble creación en el
/// mismo conflicto de dominio que el chequeo previo
fn map_duplicate_sub_trip(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            return AppError::Conflict("Trip already started.".to_string());
        }
    }
    AppError::Database(err)
}
