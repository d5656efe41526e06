use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::user::{User, UserLog};
use crate::utils::errors::AppError;

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insertar el usuario dentro de una transacción abierta por el caller:
    /// el registro solo se confirma si el despacho del OTP también sale bien.
    pub async fn create_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        firstname: String,
        lastname: String,
        country_code: String,
        mobile_no: String,
        role: &str,
    ) -> Result<User, AppError> {
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, firstname, lastname, country_code, mobile_no, role,
                               verified, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(firstname)
        .bind(lastname)
        .bind(country_code)
        .bind(mobile_no)
        .bind(role)
        .bind(now)
        .fetch_one(&mut **tx)
        .await
        .map_err(map_duplicate_user)?;

        Ok(user)
    }

    pub async fn create_sale_person(
        &self,
        firstname: String,
        lastname: String,
        country_code: String,
        mobile_no: String,
        email: Option<String>,
    ) -> Result<User, AppError> {
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, firstname, lastname, country_code, mobile_no, email, role,
                               verified, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'sale-person', TRUE, $7, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(firstname)
        .bind(lastname)
        .bind(country_code)
        .bind(mobile_no)
        .bind(email)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_duplicate_user)?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_mobile_no(&self, mobile_no: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE mobile_no = $1")
            .bind(mobile_no)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn mark_verified(&self, id: Uuid) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET verified = TRUE, updated_at = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User Not Found".to_string()))?;

        Ok(user)
    }

    /// mobile_no y password no se tocan por este camino
    pub async fn update_profile(
        &self,
        id: Uuid,
        firstname: Option<String>,
        lastname: Option<String>,
        email: Option<String>,
        profile_url: Option<String>,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET firstname = COALESCE($2, firstname),
                lastname = COALESCE($3, lastname),
                email = COALESCE($4, email),
                profile_url = COALESCE($5, profile_url),
                updated_at = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(firstname)
        .bind(lastname)
        .bind(email)
        .bind(profile_url)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_duplicate_user)?
        .ok_or_else(|| AppError::NotFound("User Not Found".to_string()))?;

        Ok(user)
    }

    /// Actualización del perfil de administrador, password incluido
    pub async fn update_admin(
        &self,
        id: Uuid,
        firstname: Option<String>,
        lastname: Option<String>,
        email: Option<String>,
        mobile_no: Option<String>,
        profile_url: Option<String>,
        password_hash: Option<String>,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET firstname = COALESCE($2, firstname),
                lastname = COALESCE($3, lastname),
                email = COALESCE($4, email),
                mobile_no = COALESCE($5, mobile_no),
                profile_url = COALESCE($6, profile_url),
                password_hash = COALESCE($7, password_hash),
                updated_at = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(firstname)
        .bind(lastname)
        .bind(email)
        .bind(mobile_no)
        .bind(profile_url)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_duplicate_user)?
        .ok_or_else(|| AppError::NotFound("User Not Found".to_string()))?;

        Ok(user)
    }

    pub async fn list(
        &self,
        role: Option<&str>,
        search: Option<&str>,
        limit_offset: Option<(i64, i64)>,
    ) -> Result<(Vec<User>, i64), AppError> {
        let (limit, offset) = limit_offset.unwrap_or((i64::MAX, 0));

        let rows = sqlx::query_as::<_, UserCountRow>(
            r#"
            SELECT *, COUNT(*) OVER() AS total_count
            FROM users
            WHERE ($1::text IS NULL OR role = $1)
              AND ($2::text IS NULL OR firstname ILIKE '%' || $2 || '%')
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(role)
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = rows.first().map(|row| row.total_count).unwrap_or(0);
        Ok((rows.into_iter().map(|row| row.user).collect(), total))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(())
    }

    /// Barrido de registros sin verificar más viejos que `minutes`.
    /// Se ejecuta inline al inicio del listado de administración.
    pub async fn delete_stale_unverified(&self, minutes: i64) -> Result<u64, AppError> {
        let deleted = sqlx::query(
            "DELETE FROM users WHERE verified = FALSE AND created_at < NOW() - ($1 * INTERVAL '1 minute')",
        )
        .bind(minutes)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(deleted)
    }

    pub async fn check_in(&self, user_id: Uuid) -> Result<UserLog, AppError> {
        // un solo turno abierto por usuario
        let (open,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM user_logs WHERE user_id = $1 AND end_time IS NULL)",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        if open {
            return Err(AppError::Conflict("Already checked in.".to_string()));
        }

        let log = sqlx::query_as::<_, UserLog>(
            r#"
            INSERT INTO user_logs (id, user_id, start_time)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(log)
    }

    pub async fn check_out(&self, user_id: Uuid) -> Result<UserLog, AppError> {
        let log = sqlx::query_as::<_, UserLog>(
            r#"
            UPDATE user_logs
            SET end_time = $2
            WHERE id = (
                SELECT id FROM user_logs
                WHERE user_id = $1 AND end_time IS NULL
                ORDER BY start_time DESC
                LIMIT 1
            )
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::BadRequest("No open check-in found.".to_string()))?;

        Ok(log)
    }
}

/// Violaciones de unicidad -> mensajes de dominio
fn map_duplicate_user(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or_default();
            if constraint.contains("mobile_no") {
                return AppError::Conflict("Already registered mobile number.".to_string());
            }
            if constraint.contains("email") {
                return AppError::Conflict("User with this email already exists.".to_string());
            }
        }
    }
    AppError::Database(err)
}

#[derive(sqlx::FromRow)]
struct UserCountRow {
    #[sqlx(flatten)]
    user: User,
    total_count: i64,
}
