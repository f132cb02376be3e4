//! Repository for the `jf_playback_activity` table.

use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgConnection, PgPool, Postgres};

use crate::models::activity::{CreatePlaybackActivity, PlaybackActivity};

const COLUMNS: &str = "id, session_id, user_id, user_name, client, device_name, device_id, \
    application_version, remote_end_point, now_playing_item_id, now_playing_item_name, \
    season_id, episode_id, play_method, is_paused, playback_duration_secs, plugin_row_id, \
    activity_date_inserted, created_at, updated_at";

const INSERT: &str = "INSERT INTO jf_playback_activity
        (session_id, user_id, user_name, client, device_name, device_id,
         application_version, remote_end_point, now_playing_item_id, now_playing_item_name,
         season_id, episode_id, play_method, is_paused, playback_duration_secs,
         plugin_row_id, activity_date_inserted)
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)";

fn bind_insert<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    input: &'q CreatePlaybackActivity,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    let s = &input.session;
    query
        .bind(&s.session_id)
        .bind(&s.user_id)
        .bind(&s.user_name)
        .bind(&s.client)
        .bind(&s.device_name)
        .bind(&s.device_id)
        .bind(&s.application_version)
        .bind(&s.remote_end_point)
        .bind(&s.now_playing_item_id)
        .bind(&s.now_playing_item_name)
        .bind(&s.season_id)
        .bind(&s.episode_id)
        .bind(&s.play_method)
        .bind(s.is_paused)
        .bind(input.playback_duration_secs)
        .bind(input.plugin_row_id)
        .bind(input.activity_date_inserted)
}

/// Provides insert and paging operations for playback history.
pub struct ActivityRepo;

impl ActivityRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreatePlaybackActivity,
    ) -> Result<PlaybackActivity, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::create_with(&mut *conn, input).await
    }

    /// Insert on an existing connection or transaction.
    pub async fn create_with(
        conn: &mut PgConnection,
        input: &CreatePlaybackActivity,
    ) -> Result<PlaybackActivity, sqlx::Error> {
        let query = format!("{INSERT} RETURNING {COLUMNS}");
        bind_insert(sqlx::query_as::<_, PlaybackActivity>(&query), input)
            .fetch_one(conn)
            .await
    }

    /// Insert a row imported from the Playback Reporting plugin.
    ///
    /// Returns `false` when a row with the same `plugin_row_id` already
    /// exists, so re-running an import is harmless.
    pub async fn import(pool: &PgPool, input: &CreatePlaybackActivity) -> Result<bool, sqlx::Error> {
        let query = format!("{INSERT} ON CONFLICT (plugin_row_id) DO NOTHING RETURNING id");
        let inserted: Option<(i64,)> = bind_insert(sqlx::query_as(&query), input)
            .fetch_optional(pool)
            .await?;
        Ok(inserted.is_some())
    }

    /// Highest plugin row id imported so far.
    pub async fn max_plugin_row_id(pool: &PgPool) -> Result<Option<i64>, sqlx::Error> {
        let (max,): (Option<i64>,) =
            sqlx::query_as("SELECT MAX(plugin_row_id) FROM jf_playback_activity")
                .fetch_one(pool)
                .await?;
        Ok(max)
    }

    /// Most recent activity first.
    pub async fn list_recent(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PlaybackActivity>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM jf_playback_activity
             ORDER BY activity_date_inserted DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, PlaybackActivity>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM jf_playback_activity")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
