//! Playback history and in-progress session tracking.

use jellystat_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Playback activity (append-only history)
// ---------------------------------------------------------------------------

/// A completed playback.
///
/// For episodes `now_playing_item_id` is the series id and `episode_id` /
/// `season_id` identify what was actually watched.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlaybackActivity {
    pub id: DbId,
    pub session_id: Option<String>,
    pub user_id: String,
    pub user_name: Option<String>,
    pub client: Option<String>,
    pub device_name: Option<String>,
    pub device_id: Option<String>,
    pub application_version: Option<String>,
    pub remote_end_point: Option<String>,
    pub now_playing_item_id: String,
    pub now_playing_item_name: Option<String>,
    pub season_id: Option<String>,
    pub episode_id: Option<String>,
    pub play_method: Option<String>,
    pub is_paused: bool,
    pub playback_duration_secs: i64,
    pub plugin_row_id: Option<i64>,
    pub activity_date_inserted: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a playback record.
#[derive(Debug, Clone)]
pub struct CreatePlaybackActivity {
    pub session: PlaybackSession,
    pub playback_duration_secs: i64,
    /// Row id in the Playback Reporting plugin for imported history.
    pub plugin_row_id: Option<i64>,
    pub activity_date_inserted: Timestamp,
}

// ---------------------------------------------------------------------------
// Watchdog (sessions in progress)
// ---------------------------------------------------------------------------

/// What a session is doing right now, as derived from `GET /sessions`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackSession {
    pub session_id: Option<String>,
    pub user_id: String,
    pub user_name: Option<String>,
    pub client: Option<String>,
    pub device_name: Option<String>,
    pub device_id: Option<String>,
    pub application_version: Option<String>,
    pub remote_end_point: Option<String>,
    pub now_playing_item_id: String,
    pub now_playing_item_name: Option<String>,
    pub season_id: Option<String>,
    pub episode_id: Option<String>,
    pub play_method: Option<String>,
    pub is_paused: bool,
}

/// A session/item pair currently being played.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WatchdogEntry {
    pub id: DbId,
    pub session_id: String,
    pub user_id: String,
    pub user_name: Option<String>,
    pub client: Option<String>,
    pub device_name: Option<String>,
    pub device_id: Option<String>,
    pub application_version: Option<String>,
    pub remote_end_point: Option<String>,
    pub now_playing_item_id: String,
    pub now_playing_item_name: Option<String>,
    pub season_id: Option<String>,
    pub episode_id: Option<String>,
    pub play_method: Option<String>,
    pub is_paused: bool,
    pub playback_duration_secs: i64,
    pub last_seen_at: Timestamp,
    pub started_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl WatchdogEntry {
    /// Convert a finished entry into a history record stamped at `ended_at`.
    pub fn into_activity(self, ended_at: Timestamp) -> CreatePlaybackActivity {
        CreatePlaybackActivity {
            playback_duration_secs: self.playback_duration_secs,
            plugin_row_id: None,
            activity_date_inserted: ended_at,
            session: PlaybackSession {
                session_id: Some(self.session_id),
                user_id: self.user_id,
                user_name: self.user_name,
                client: self.client,
                device_name: self.device_name,
                device_id: self.device_id,
                application_version: self.application_version,
                remote_end_point: self.remote_end_point,
                now_playing_item_id: self.now_playing_item_id,
                now_playing_item_name: self.now_playing_item_name,
                season_id: self.season_id,
                episode_id: self.episode_id,
                play_method: self.play_method,
                is_paused: self.is_paused,
            },
        }
    }
}
