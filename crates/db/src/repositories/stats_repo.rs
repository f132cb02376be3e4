//! Reporting queries behind the `/stats` endpoints.
//!
//! Plays are attributed to a library through the item they reference
//! (`now_playing_item_id` → `jf_library_items.parent_id`). Time buckets are
//! computed in UTC.

use sqlx::PgPool;

use crate::models::stats::{ActiveUser, LibraryBucketCount, LibraryLastPlayed, LibraryOverview};

/// Provides the aggregate queries used by the dashboard.
pub struct StatsRepo;

impl StatsRepo {
    /// Names of all non-archived libraries, the chart series.
    pub async fn library_names(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM jf_libraries WHERE NOT archived ORDER BY name")
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// Plays per (hour of day, library) over the last `days` days.
    pub async fn views_by_hour(
        pool: &PgPool,
        days: i64,
    ) -> Result<Vec<LibraryBucketCount>, sqlx::Error> {
        Self::views_by_bucket(pool, "HOUR", days).await
    }

    /// Plays per (day of week, library) over the last `days` days; bucket 0
    /// is Sunday.
    pub async fn views_by_weekday(
        pool: &PgPool,
        days: i64,
    ) -> Result<Vec<LibraryBucketCount>, sqlx::Error> {
        Self::views_by_bucket(pool, "DOW", days).await
    }

    async fn views_by_bucket(
        pool: &PgPool,
        field: &'static str,
        days: i64,
    ) -> Result<Vec<LibraryBucketCount>, sqlx::Error> {
        let query = format!(
            "SELECT EXTRACT({field} FROM a.activity_date_inserted AT TIME ZONE 'UTC')::INT AS bucket,
                    l.name AS library_name,
                    COUNT(*)::BIGINT AS plays
             FROM jf_playback_activity a
             JOIN jf_library_items i ON i.id = a.now_playing_item_id
             JOIN jf_libraries l ON l.id = i.parent_id
             WHERE a.activity_date_inserted >= NOW() - make_interval(days => $1::INT)
             GROUP BY 1, 2
             ORDER BY 1, 2"
        );
        sqlx::query_as::<_, LibraryBucketCount>(&query)
            .bind(days)
            .fetch_all(pool)
            .await
    }

    /// Most recent distinct plays in a library, via `fs_last_library_activity`.
    pub async fn last_library_activity(
        pool: &PgPool,
        library_id: &str,
    ) -> Result<Vec<LibraryLastPlayed>, sqlx::Error> {
        sqlx::query_as::<_, LibraryLastPlayed>(
            "SELECT id, episode_id, name, episode_name, season_number, episode_number,
                    primary_image_hash, user_id, user_name,
                    EXTRACT(EPOCH FROM last_played)::BIGINT AS last_played_secs
             FROM fs_last_library_activity($1)
             ORDER BY last_played",
        )
        .bind(library_id)
        .fetch_all(pool)
        .await
    }

    /// Catalogue and play totals for every non-archived library.
    pub async fn library_overview(pool: &PgPool) -> Result<Vec<LibraryOverview>, sqlx::Error> {
        sqlx::query_as::<_, LibraryOverview>(
            "SELECT l.id, l.name, l.collection_type,
                    (SELECT COUNT(*) FROM jf_library_items i
                     WHERE i.parent_id = l.id AND NOT i.archived) AS item_count,
                    (SELECT COUNT(*) FROM jf_library_seasons s
                     JOIN jf_library_items i ON i.id = s.series_id
                     WHERE i.parent_id = l.id AND NOT s.archived) AS season_count,
                    (SELECT COUNT(*) FROM jf_library_episodes e
                     JOIN jf_library_items i ON i.id = e.series_id
                     WHERE i.parent_id = l.id AND NOT e.archived) AS episode_count,
                    COALESCE(p.play_count, 0)::BIGINT AS play_count,
                    COALESCE(p.total_secs, 0)::BIGINT AS total_playback_secs,
                    p.last_activity
             FROM jf_libraries l
             LEFT JOIN LATERAL (
                 SELECT COUNT(*) AS play_count,
                        SUM(a.playback_duration_secs) AS total_secs,
                        MAX(a.activity_date_inserted) AS last_activity
                 FROM jf_playback_activity a
                 JOIN jf_library_items i ON i.id = a.now_playing_item_id
                 WHERE i.parent_id = l.id
             ) p ON TRUE
             WHERE NOT l.archived
             ORDER BY l.name",
        )
        .fetch_all(pool)
        .await
    }

    /// Users ranked by plays over the last `days` days.
    pub async fn most_active_users(
        pool: &PgPool,
        days: i64,
        limit: i64,
    ) -> Result<Vec<ActiveUser>, sqlx::Error> {
        sqlx::query_as::<_, ActiveUser>(
            "SELECT a.user_id,
                    MAX(a.user_name) AS user_name,
                    COUNT(*)::BIGINT AS plays,
                    COALESCE(SUM(a.playback_duration_secs), 0)::BIGINT AS total_playback_secs
             FROM jf_playback_activity a
             WHERE a.activity_date_inserted >= NOW() - make_interval(days => $1::INT)
             GROUP BY a.user_id
             ORDER BY plays DESC, a.user_id
             LIMIT $2",
        )
        .bind(days)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
