//! Repository for the `jf_activity_watchdog` table.
//!
//! The watchdog keeps one row per (session, item, episode) that is currently
//! playing. Every poll refreshes `last_seen_at` for the pairs still active;
//! pairs not refreshed by a poll have ended and are moved into playback
//! history.

use jellystat_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::activity::{PlaybackActivity, PlaybackSession, WatchdogEntry};
use crate::repositories::ActivityRepo;

const COLUMNS: &str = "id, session_id, user_id, user_name, client, device_name, device_id, \
    application_version, remote_end_point, now_playing_item_id, now_playing_item_name, \
    season_id, episode_id, play_method, is_paused, playback_duration_secs, last_seen_at, \
    started_at, created_at, updated_at";

/// Result of closing the pairs that were not seen by the latest poll.
#[derive(Debug, Default)]
pub struct FinishedPlayback {
    pub recorded: Vec<PlaybackActivity>,
    /// Pairs dropped for being shorter than the minimum duration.
    pub discarded: usize,
}

pub struct WatchdogRepo;

impl WatchdogRepo {
    /// Record that `session` was seen playing at `seen_at`.
    ///
    /// New pairs start with zero duration. Existing pairs accumulate the time
    /// since they were last seen, unless they were paused at that point.
    pub async fn record_seen(
        pool: &PgPool,
        session: &PlaybackSession,
        seen_at: Timestamp,
    ) -> Result<WatchdogEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO jf_activity_watchdog
                (session_id, user_id, user_name, client, device_name, device_id,
                 application_version, remote_end_point, now_playing_item_id,
                 now_playing_item_name, season_id, episode_id, play_method, is_paused,
                 last_seen_at, started_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $15)
             ON CONFLICT (session_id, now_playing_item_id, (COALESCE(episode_id, '')))
             DO UPDATE SET
                playback_duration_secs = jf_activity_watchdog.playback_duration_secs
                    + CASE WHEN jf_activity_watchdog.is_paused THEN 0
                           ELSE GREATEST(0, EXTRACT(EPOCH FROM
                                EXCLUDED.last_seen_at - jf_activity_watchdog.last_seen_at))::BIGINT
                      END,
                user_name = EXCLUDED.user_name,
                season_id = EXCLUDED.season_id,
                play_method = EXCLUDED.play_method,
                is_paused = EXCLUDED.is_paused,
                last_seen_at = EXCLUDED.last_seen_at
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WatchdogEntry>(&query)
            .bind(session.session_id.as_deref().unwrap_or_default())
            .bind(&session.user_id)
            .bind(&session.user_name)
            .bind(&session.client)
            .bind(&session.device_name)
            .bind(&session.device_id)
            .bind(&session.application_version)
            .bind(&session.remote_end_point)
            .bind(&session.now_playing_item_id)
            .bind(&session.now_playing_item_name)
            .bind(&session.season_id)
            .bind(&session.episode_id)
            .bind(&session.play_method)
            .bind(session.is_paused)
            .bind(seen_at)
            .fetch_one(pool)
            .await
    }

    /// Pairs currently being played, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<WatchdogEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jf_activity_watchdog ORDER BY started_at, id");
        sqlx::query_as::<_, WatchdogEntry>(&query)
            .fetch_all(pool)
            .await
    }

    /// Move every pair last seen before `seen_at` into playback history.
    ///
    /// Runs in a transaction. Pairs with less than `min_duration_secs` of
    /// playback are deleted without being recorded.
    pub async fn finish_unseen(
        pool: &PgPool,
        seen_at: Timestamp,
        min_duration_secs: i64,
    ) -> Result<FinishedPlayback, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "DELETE FROM jf_activity_watchdog WHERE last_seen_at < $1 RETURNING {COLUMNS}"
        );
        let ended = sqlx::query_as::<_, WatchdogEntry>(&query)
            .bind(seen_at)
            .fetch_all(&mut *tx)
            .await?;

        let mut finished = FinishedPlayback::default();
        for entry in ended {
            if entry.playback_duration_secs < min_duration_secs {
                finished.discarded += 1;
                continue;
            }
            let activity = entry.into_activity(seen_at);
            finished
                .recorded
                .push(ActivityRepo::create_with(&mut *tx, &activity).await?);
        }

        tx.commit().await?;
        Ok(finished)
    }
}
