//! Persistencia del ciclo de vida de viajes
//!
//! Todas las operaciones de varias escrituras (crear, completar, borrar)
//! corren dentro de una transacción. El bloqueo del camión es un update
//! condicional atómico: reclamar solo si sigue disponible, verificando
//! las filas afectadas.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::trip_dto::TripMilestone;
use crate::models::trip::{DriverShift, Trip, STATUS_COMPLETED, STATUS_ON_GOING};
use crate::utils::errors::AppError;

pub struct TripRepository {
    pool: PgPool,
}

/// Columnas de un viaje con sus referencias resueltas (camión + las cuatro
/// ubicaciones). Los joins son LEFT: una referencia rota no oculta el viaje.
#[derive(Debug, sqlx::FromRow)]
pub struct TripJoinedRow {
    #[sqlx(flatten)]
    pub trip: Trip,
    pub truck_pk: Option<Uuid>,
    pub truck_code: Option<String>,
    pub truck_plate: Option<String>,
    pub truck_name: Option<String>,
    pub source_id: Option<Uuid>,
    pub source_name: Option<String>,
    pub source_lat: Option<f64>,
    pub source_long: Option<f64>,
    pub load_id: Option<Uuid>,
    pub load_name: Option<String>,
    pub load_lat: Option<f64>,
    pub load_long: Option<f64>,
    pub unload_id: Option<Uuid>,
    pub unload_name: Option<String>,
    pub unload_lat: Option<f64>,
    pub unload_long: Option<f64>,
    pub end_id: Option<Uuid>,
    pub end_name: Option<String>,
    pub end_lat: Option<f64>,
    pub end_long: Option<f64>,
    #[sqlx(default)]
    pub total_count: Option<i64>,
}

/// Una fila del historial de un conductor: viaje completado + ubicación de
/// origen + destino del sub-viaje cuando existe (outer join)
#[derive(Debug, sqlx::FromRow)]
pub struct TripHistoryRow {
    pub id: Uuid,
    pub descr: String,
    pub status: String,
    pub start_milage: Decimal,
    pub end_milage: Option<Decimal>,
    pub end_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub source_id: Option<Uuid>,
    pub source_name: Option<String>,
    pub source_lat: Option<f64>,
    pub source_long: Option<f64>,
    pub sub_trip_id: Option<Uuid>,
    pub sub_trip_net_wt: Option<Decimal>,
    pub sub_dest_id: Option<Uuid>,
    pub sub_dest_name: Option<String>,
    pub sub_dest_lat: Option<f64>,
    pub sub_dest_long: Option<f64>,
}

const JOINED_SELECT: &str = r#"
    SELECT t.*,
           k.id AS truck_pk, k.truck_id AS truck_code, k.plate_no AS truck_plate, k.name AS truck_name,
           sl.id AS source_id, sl.name AS source_name, sl.lat AS source_lat, sl.long AS source_long,
           ll.id AS load_id, ll.name AS load_name, ll.lat AS load_lat, ll.long AS load_long,
           ul.id AS unload_id, ul.name AS unload_name, ul.lat AS unload_lat, ul.long AS unload_long,
           el.id AS end_id, el.name AS end_name, el.lat AS end_lat, el.long AS end_long
    FROM trips t
    LEFT JOIN trucks k ON k.id = t.truck
    LEFT JOIN locations sl ON sl.id = t.source_loc
    LEFT JOIN locations ll ON ll.id = t.load_loc
    LEFT JOIN locations ul ON ul.id = t.unload_loc
    LEFT JOIN locations el ON el.id = t.end_loc
"#;

impl TripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// True cuando el conductor es la entrada vigente (última) de algún
    /// viaje en curso. Quien ya entregó el turno no cuenta.
    pub async fn has_on_going_trip(&self, driver_id: Uuid) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM trips
                WHERE status = $1 AND driver_log->-1->>'d_id' = $2
            )
            "#,
        )
        .bind(STATUS_ON_GOING)
        .bind(driver_id.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Crear un viaje reclamando el camión en la misma transacción
    pub async fn create(
        &self,
        driver_id: Uuid,
        descr: String,
        truck: Uuid,
        source_loc: Uuid,
        load_loc: Uuid,
        dispatch: Option<String>,
        start_milage: Decimal,
    ) -> Result<Trip, AppError> {
        let mut tx = self.pool.begin().await?;

        // reclamo atómico: solo pasa si el camión sigue disponible
        let claimed = sqlx::query("UPDATE trucks SET is_avail = FALSE WHERE id = $1 AND is_avail = TRUE")
            .bind(truck)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if claimed == 0 {
            let (exists,): (bool,) =
                sqlx::query_as("SELECT EXISTS(SELECT 1 FROM trucks WHERE id = $1)")
                    .bind(truck)
                    .fetch_one(&mut *tx)
                    .await?;

            return Err(if exists {
                AppError::Conflict("Truck already in use.".to_string())
            } else {
                AppError::NotFound("Truck not found.".to_string())
            });
        }

        let (driver_busy,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM trips
                WHERE status = $1 AND driver_log->-1->>'d_id' = $2
            )
            "#,
        )
        .bind(STATUS_ON_GOING)
        .bind(driver_id.to_string())
        .fetch_one(&mut *tx)
        .await?;

        if driver_busy {
            return Err(AppError::Conflict("Current trip is not completed yet.".to_string()));
        }

        let shifts = vec![DriverShift { d_id: driver_id, time: Utc::now() }];

        let trip = sqlx::query_as::<_, Trip>(
            r#"
            INSERT INTO trips (id, descr, truck, source_loc, load_loc, dispatch, start_milage,
                               driver_log, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(descr)
        .bind(truck)
        .bind(source_loc)
        .bind(load_loc)
        .bind(dispatch)
        .bind(start_milage)
        .bind(Json(shifts))
        .bind(STATUS_ON_GOING)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(trip)
    }

    /// Relevo de conductor: agrega una entrada a la secuencia sin tocar
    /// ni el camión ni el estado del viaje
    pub async fn shift_change(&self, trip_id: Uuid, driver_id: Uuid) -> Result<Trip, AppError> {
        if self.has_on_going_trip(driver_id).await? {
            return Err(AppError::Conflict("Current trip is not completed yet.".to_string()));
        }

        let shift = DriverShift { d_id: driver_id, time: Utc::now() };

        let trip = sqlx::query_as::<_, Trip>(
            r#"
            UPDATE trips
            SET driver_log = driver_log || $2
            WHERE id = $1 AND status = $3
            RETURNING *
            "#,
        )
        .bind(trip_id)
        .bind(Json(shift))
        .bind(STATUS_ON_GOING)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("No On-going trip".to_string()))?;

        Ok(trip)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Trip>, AppError> {
        let trip = sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(trip)
    }

    pub async fn find_joined_by_id(&self, id: Uuid) -> Result<Option<TripJoinedRow>, AppError> {
        let query = format!("{} WHERE t.id = $1", JOINED_SELECT);

        let row = sqlx::query_as::<_, TripJoinedRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Viaje en curso donde el conductor aparece en cualquier punto de la
    /// secuencia (containment sobre el JSONB)
    pub async fn find_on_going_by_driver(
        &self,
        driver_id: Uuid,
    ) -> Result<Option<TripJoinedRow>, AppError> {
        let query = format!("{} WHERE t.status = $1 AND t.driver_log @> $2", JOINED_SELECT);

        let row = sqlx::query_as::<_, TripJoinedRow>(&query)
            .bind(STATUS_ON_GOING)
            .bind(Json(serde_json::json!([{ "d_id": driver_id }])))
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Aplicar un hito sobre un viaje en curso. Los viajes completados no
    /// son elegibles: el filtro de estado va en el predicado del update.
    pub async fn apply_milestone(
        &self,
        trip_id: Uuid,
        milestone: TripMilestone,
    ) -> Result<Trip, AppError> {
        let not_found = || AppError::NotFound("No on-going trip found with this ID.".to_string());

        let trip = match milestone {
            TripMilestone::Arrival => {
                self.stamp(trip_id, "arrival_time").await?
            }
            TripMilestone::LoadStart => {
                self.stamp(trip_id, "load_time_start").await?
            }
            TripMilestone::LoadEnd => {
                self.stamp(trip_id, "load_time_end").await?
            }
            TripMilestone::UnloadStart { unload_loc } => {
                sqlx::query_as::<_, Trip>(
                    r#"
                    UPDATE trips
                    SET unload_time_start = $3, unload_loc = COALESCE($4, unload_loc)
                    WHERE id = $1 AND status = $2
                    RETURNING *
                    "#,
                )
                .bind(trip_id)
                .bind(STATUS_ON_GOING)
                .bind(Utc::now())
                .bind(unload_loc)
                .fetch_optional(&self.pool)
                .await?
            }
            TripMilestone::UnloadEnd => {
                self.stamp(trip_id, "unload_time_end").await?
            }
            TripMilestone::Complete { end_milage, end_loc } => {
                let end_milage = Decimal::from_f64_retain(end_milage)
                    .ok_or_else(|| AppError::Validation("Invalid mileage value".to_string()))?;
                return self.complete(trip_id, end_milage, end_loc).await;
            }
        };

        trip.ok_or_else(not_found)
    }

    /// Hitos que solo sellan un timestamp
    async fn stamp(&self, trip_id: Uuid, column: &str) -> Result<Option<Trip>, AppError> {
        let query = format!(
            "UPDATE trips SET {} = $3 WHERE id = $1 AND status = $2 RETURNING *",
            column
        );

        let trip = sqlx::query_as::<_, Trip>(&query)
            .bind(trip_id)
            .bind(STATUS_ON_GOING)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;

        Ok(trip)
    }

    /// Transición terminal: cerrar el viaje y soltar el camión en la misma
    /// transacción. El camión se libera solo si ningún otro viaje en curso
    /// lo reclama.
    async fn complete(
        &self,
        trip_id: Uuid,
        end_milage: Decimal,
        end_loc: Option<Uuid>,
    ) -> Result<Trip, AppError> {
        let mut tx = self.pool.begin().await?;

        let trip = sqlx::query_as::<_, Trip>(
            r#"
            UPDATE trips
            SET end_milage = $3, end_loc = COALESCE($4, end_loc), end_time = $5, status = $6
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(trip_id)
        .bind(STATUS_ON_GOING)
        .bind(end_milage)
        .bind(end_loc)
        .bind(Utc::now())
        .bind(STATUS_COMPLETED)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("No on-going trip found with this ID.".to_string()))?;

        sqlx::query(
            r#"
            UPDATE trucks SET is_avail = TRUE
            WHERE id = $1
              AND NOT EXISTS(SELECT 1 FROM trips WHERE truck = $1 AND status = $2)
            "#,
        )
        .bind(trip.truck)
        .bind(STATUS_ON_GOING)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(trip)
    }

    /// Borrado administrativo: libera el camión salvo que otro viaje en
    /// curso lo reclame, borra los sub-viajes y después el viaje
    pub async fn delete(&self, trip_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let trip = sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = $1 FOR UPDATE")
            .bind(trip_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))?;

        let (claimed_by_other,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM trips WHERE truck = $1 AND status = $2 AND id <> $3)",
        )
        .bind(trip.truck)
        .bind(STATUS_ON_GOING)
        .bind(trip_id)
        .fetch_one(&mut *tx)
        .await?;

        if !claimed_by_other {
            sqlx::query("UPDATE trucks SET is_avail = TRUE WHERE id = $1")
                .bind(trip.truck)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("DELETE FROM sub_trips WHERE trip = $1")
            .bind(trip_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM trips WHERE id = $1")
            .bind(trip_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Historial del conductor: viajes completados con origen resuelto y,
    /// cuando existe, el destino de su sub-viaje (outer join: un viaje sin
    /// sub-viaje aparece igual)
    pub async fn history_by_driver(&self, driver_id: Uuid) -> Result<Vec<TripHistoryRow>, AppError> {
        let rows = sqlx::query_as::<_, TripHistoryRow>(
            r#"
            SELECT t.id, t.descr, t.status, t.start_milage, t.end_milage, t.end_time, t.created_at,
                   sl.id AS source_id, sl.name AS source_name, sl.lat AS source_lat, sl.long AS source_long,
                   st.id AS sub_trip_id, st.net_wt AS sub_trip_net_wt,
                   sd.id AS sub_dest_id, sd.name AS sub_dest_name, sd.lat AS sub_dest_lat, sd.long AS sub_dest_long
            FROM trips t
            LEFT JOIN locations sl ON sl.id = t.source_loc
            LEFT JOIN sub_trips st ON st.trip = t.id
            LEFT JOIN locations sd ON sd.id = st.dest
            WHERE t.status = $1 AND t.driver_log @> $2
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(STATUS_COMPLETED)
        .bind(Json(serde_json::json!([{ "d_id": driver_id }])))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Listado administrativo: página + total en una sola query
    /// (COUNT(*) OVER() evita contar y paginar en dos lecturas separadas)
    pub async fn list(
        &self,
        status: Option<&str>,
        limit_offset: Option<(i64, i64)>,
    ) -> Result<(Vec<TripJoinedRow>, i64), AppError> {
        let (limit, offset) = limit_offset.unwrap_or((i64::MAX, 0));
        let query = format!(
            r#"
            {}
            WHERE ($1::text IS NULL OR t.status = $1)
            ORDER BY t.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
            JOINED_SELECT.replace(
                "SELECT t.*,",
                "SELECT t.*, COUNT(*) OVER() AS total_count,"
            )
        );

        let rows = sqlx::query_as::<_, TripJoinedRow>(&query)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let total = rows.first().and_then(|row| row.total_count).unwrap_or(0);
        Ok((rows, total))
    }
}
