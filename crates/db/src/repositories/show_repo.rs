//! Repositories for `jf_library_seasons` and `jf_library_episodes`.

use sqlx::PgPool;

use crate::models::show::{Episode, Season, UpsertEpisode, UpsertSeason};

const SEASON_COLUMNS: &str = "id, series_id, name, index_number, primary_image_hash, \
    archived, created_at, updated_at";

const EPISODE_COLUMNS: &str = "id, series_id, season_id, name, index_number, \
    parent_index_number, run_time_ticks, size_bytes, date_created, archived, \
    created_at, updated_at";

// ---------------------------------------------------------------------------
// Seasons
// ---------------------------------------------------------------------------

pub struct SeasonRepo;

impl SeasonRepo {
    pub async fn upsert(pool: &PgPool, input: &UpsertSeason) -> Result<Season, sqlx::Error> {
        let query = format!(
            "INSERT INTO jf_library_seasons (id, series_id, name, index_number, primary_image_hash)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE SET
                series_id = EXCLUDED.series_id,
                name = EXCLUDED.name,
                index_number = EXCLUDED.index_number,
                primary_image_hash = EXCLUDED.primary_image_hash,
                archived = false
             RETURNING {SEASON_COLUMNS}"
        );
        sqlx::query_as::<_, Season>(&query)
            .bind(&input.id)
            .bind(&input.series_id)
            .bind(&input.name)
            .bind(input.index_number)
            .bind(&input.primary_image_hash)
            .fetch_one(pool)
            .await
    }

    /// Non-archived seasons of a series in season order.
    pub async fn list_by_series(
        pool: &PgPool,
        series_id: &str,
    ) -> Result<Vec<Season>, sqlx::Error> {
        let query = format!(
            "SELECT {SEASON_COLUMNS} FROM jf_library_seasons
             WHERE series_id = $1 AND NOT archived
             ORDER BY index_number NULLS LAST, name"
        );
        sqlx::query_as::<_, Season>(&query)
            .bind(series_id)
            .fetch_all(pool)
            .await
    }

    pub async fn archive_missing(pool: &PgPool, present_ids: &[String]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE jf_library_seasons SET archived = NOT (id = ANY($1))
             WHERE archived = (id = ANY($1))",
        )
        .bind(present_ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}

// ---------------------------------------------------------------------------
// Episodes
// ---------------------------------------------------------------------------

pub struct EpisodeRepo;

impl EpisodeRepo {
    pub async fn upsert(pool: &PgPool, input: &UpsertEpisode) -> Result<Episode, sqlx::Error> {
        let query = format!(
            "INSERT INTO jf_library_episodes
                (id, series_id, season_id, name, index_number, parent_index_number,
                 run_time_ticks, size_bytes, date_created)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (id) DO UPDATE SET
                series_id = EXCLUDED.series_id,
                season_id = EXCLUDED.season_id,
                name = EXCLUDED.name,
                index_number = EXCLUDED.index_number,
                parent_index_number = EXCLUDED.parent_index_number,
                run_time_ticks = EXCLUDED.run_time_ticks,
                size_bytes = EXCLUDED.size_bytes,
                date_created = EXCLUDED.date_created,
                archived = false
             RETURNING {EPISODE_COLUMNS}"
        );
        sqlx::query_as::<_, Episode>(&query)
            .bind(&input.id)
            .bind(&input.series_id)
            .bind(&input.season_id)
            .bind(&input.name)
            .bind(input.index_number)
            .bind(input.parent_index_number)
            .bind(input.run_time_ticks)
            .bind(input.size_bytes)
            .bind(input.date_created)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Episode>, sqlx::Error> {
        let query = format!("SELECT {EPISODE_COLUMNS} FROM jf_library_episodes WHERE id = $1");
        sqlx::query_as::<_, Episode>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Non-archived episodes of a season in episode order.
    pub async fn list_by_season(
        pool: &PgPool,
        season_id: &str,
    ) -> Result<Vec<Episode>, sqlx::Error> {
        let query = format!(
            "SELECT {EPISODE_COLUMNS} FROM jf_library_episodes
             WHERE season_id = $1 AND NOT archived
             ORDER BY index_number NULLS LAST, name"
        );
        sqlx::query_as::<_, Episode>(&query)
            .bind(season_id)
            .fetch_all(pool)
            .await
    }

    pub async fn archive_missing(pool: &PgPool, present_ids: &[String]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE jf_library_episodes SET archived = NOT (id = ANY($1))
             WHERE archived = (id = ANY($1))",
        )
        .bind(present_ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
