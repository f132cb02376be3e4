//! Repository for the `jf_users` table.

use sqlx::PgPool;

use crate::models::jellyfin_user::{JellyfinUser, UpsertJellyfinUser};

const COLUMNS: &str = "id, name, is_administrator, primary_image_tag, last_login_date, \
    last_activity_date, archived, created_at, updated_at";

pub struct JellyfinUserRepo;

impl JellyfinUserRepo {
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertJellyfinUser,
    ) -> Result<JellyfinUser, sqlx::Error> {
        let query = format!(
            "INSERT INTO jf_users
                (id, name, is_administrator, primary_image_tag, last_login_date, last_activity_date)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                is_administrator = EXCLUDED.is_administrator,
                primary_image_tag = EXCLUDED.primary_image_tag,
                last_login_date = EXCLUDED.last_login_date,
                last_activity_date = EXCLUDED.last_activity_date,
                archived = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JellyfinUser>(&query)
            .bind(&input.id)
            .bind(&input.name)
            .bind(input.is_administrator)
            .bind(&input.primary_image_tag)
            .bind(input.last_login_date)
            .bind(input.last_activity_date)
            .fetch_one(pool)
            .await
    }

    /// Non-archived users ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<JellyfinUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jf_users WHERE NOT archived ORDER BY name");
        sqlx::query_as::<_, JellyfinUser>(&query).fetch_all(pool).await
    }

    pub async fn archive_missing(pool: &PgPool, present_ids: &[String]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE jf_users SET archived = NOT (id = ANY($1))
             WHERE archived = (id = ANY($1))",
        )
        .bind(present_ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
