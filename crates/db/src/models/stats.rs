//! Aggregated rows returned by the reporting queries.

use jellystat_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// One row of `fs_last_library_activity`.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LibraryLastPlayed {
    pub id: String,
    pub episode_id: Option<String>,
    pub name: String,
    pub episode_name: Option<String>,
    pub season_number: Option<i32>,
    pub episode_number: Option<i32>,
    pub primary_image_hash: Option<String>,
    pub user_id: String,
    pub user_name: Option<String>,
    /// Seconds since the activity was recorded.
    #[serde(rename = "LastPlayed")]
    pub last_played_secs: i64,
}

/// Plays of one library within one chart bucket (hour or weekday).
#[derive(Debug, Clone, FromRow)]
pub struct LibraryBucketCount {
    pub bucket: i32,
    pub library_name: String,
    pub plays: i64,
}

/// Catalogue and play counts for a library card.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LibraryOverview {
    pub id: String,
    pub name: String,
    pub collection_type: Option<String>,
    pub item_count: i64,
    pub season_count: i64,
    pub episode_count: i64,
    pub play_count: i64,
    pub total_playback_secs: i64,
    pub last_activity: Option<Timestamp>,
}

/// A user ranked by number of plays.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActiveUser {
    pub user_id: String,
    pub user_name: Option<String>,
    pub plays: i64,
    pub total_playback_secs: i64,
}
