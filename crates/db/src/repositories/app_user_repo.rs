//! Repository for the `app_users` table (dashboard logins).

use jellystat_core::types::DbId;
use sqlx::PgPool;

use crate::models::app_user::AppUser;

/// Advisory lock key serialising first-run account creation.
const FIRST_ACCOUNT_LOCK: i64 = 0x6a73_6163_6374;

const COLUMNS: &str = "id, username, password_hash, last_login_at, created_at, updated_at";

pub struct AppUserRepo;

impl AppUserRepo {
    /// Insert a new account. Fails with a `uq_app_users_username` violation
    /// if the name is taken.
    pub async fn create(
        pool: &PgPool,
        username: &str,
        password_hash: &str,
    ) -> Result<AppUser, sqlx::Error> {
        let query = format!(
            "INSERT INTO app_users (username, password_hash)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AppUser>(&query)
            .bind(username)
            .bind(password_hash)
            .fetch_one(pool)
            .await
    }

    /// Insert the first account. Returns `None` when any account already
    /// exists, including one created by a concurrent request.
    pub async fn create_first(
        pool: &PgPool,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<AppUser>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(FIRST_ACCOUNT_LOCK)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO app_users (username, password_hash)
             SELECT $1, $2
             WHERE NOT EXISTS (SELECT 1 FROM app_users)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, AppUser>(&query)
            .bind(username)
            .bind(password_hash)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(user)
    }

    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<AppUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM app_users WHERE username = $1");
        sqlx::query_as::<_, AppUser>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Number of accounts; zero means first-run setup is still pending.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM app_users")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    pub async fn record_login(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE app_users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
