//! Wire types for the subset of the Jellyfin API the dashboard consumes.
//!
//! Jellyfin serializes with PascalCase keys and omits fields freely, so every
//! struct defaults missing fields and ignores unknown ones.

use std::collections::HashMap;

use jellystat_core::types::Timestamp;
use serde::{Deserialize, Deserializer, Serialize};

/// Item types that never count as playback.
pub const TRAILER_ITEM_TYPE: &str = "Trailer";

/// Location type of placeholder items for media that is not on disk.
pub const VIRTUAL_LOCATION_TYPE: &str = "Virtual";

/// Library collection types the dashboard does not track.
pub const IGNORED_COLLECTION_TYPES: [&str; 2] = ["boxsets", "playlists"];

/// Parse Jellyfin dates, treating anything unparsable as absent.
///
/// Older servers emit dates without a zone suffix or with seven fractional
/// digits; a bad date on one item must not fail the whole page.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        chrono::DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .or_else(|_| {
                chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f")
                    .map(|naive| naive.and_utc())
            })
            .ok()
    }))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UserPolicy {
    pub is_administrator: bool,
    pub is_disabled: bool,
}

/// A Jellyfin user account.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct User {
    pub id: String,
    pub name: String,
    pub primary_image_tag: Option<String>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub last_login_date: Option<Timestamp>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub last_activity_date: Option<Timestamp>,
    pub policy: UserPolicy,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.policy.is_administrator
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// A media stream inside a [`MediaSource`] (video, audio, subtitle track).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MediaStream {
    #[serde(rename = "Type")]
    pub stream_type: Option<String>,
    pub codec: Option<String>,
    pub language: Option<String>,
    pub display_title: Option<String>,
    pub is_default: bool,
}

/// A playable file backing an item.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MediaSource {
    pub id: Option<String>,
    pub path: Option<String>,
    pub container: Option<String>,
    pub size: Option<i64>,
    pub bitrate: Option<i64>,
    pub run_time_ticks: Option<i64>,
    pub media_streams: Vec<MediaStream>,
}

/// Response of `GET /Items/{id}/playbackinfo`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PlaybackInfo {
    pub media_sources: Vec<MediaSource>,
}

/// Any Jellyfin item: library folder, movie, series, season, episode, track.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BaseItem {
    pub id: String,
    pub name: String,
    pub server_id: Option<String>,
    #[serde(rename = "Type")]
    pub item_type: Option<String>,
    pub parent_id: Option<String>,
    pub series_id: Option<String>,
    pub series_name: Option<String>,
    pub season_id: Option<String>,
    pub season_name: Option<String>,
    pub index_number: Option<i32>,
    pub parent_index_number: Option<i32>,
    pub production_year: Option<i32>,
    pub community_rating: Option<f64>,
    pub run_time_ticks: Option<i64>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub date_created: Option<Timestamp>,
    pub location_type: Option<String>,
    pub collection_type: Option<String>,
    pub image_tags: HashMap<String, String>,
    pub image_blur_hashes: HashMap<String, HashMap<String, String>>,
    pub media_sources: Vec<MediaSource>,
}

impl BaseItem {
    /// Placeholder for media that is not on disk (missing episodes etc.).
    pub fn is_virtual(&self) -> bool {
        self.location_type.as_deref() == Some(VIRTUAL_LOCATION_TYPE)
    }

    pub fn is_trailer(&self) -> bool {
        self.item_type.as_deref() == Some(TRAILER_ITEM_TYPE)
    }

    pub fn is_series(&self) -> bool {
        self.item_type.as_deref() == Some("Series")
    }

    /// Library folders of types the dashboard ignores (box sets, playlists).
    pub fn is_ignored_collection(&self) -> bool {
        self.collection_type
            .as_deref()
            .is_some_and(|t| IGNORED_COLLECTION_TYPES.contains(&t))
    }

    pub fn primary_image_tag(&self) -> Option<&str> {
        self.image_tags.get("Primary").map(String::as_str)
    }

    /// Blur hash of the primary image, used as a placeholder by the dashboard.
    pub fn primary_image_hash(&self) -> Option<&str> {
        let tag = self.primary_image_tag()?;
        self.image_blur_hashes
            .get("Primary")?
            .get(tag)
            .map(String::as_str)
    }

    /// Total size in bytes across all media sources.
    pub fn total_size(&self) -> Option<i64> {
        let sizes: Vec<i64> = self.media_sources.iter().filter_map(|m| m.size).collect();
        (!sizes.is_empty()).then(|| sizes.iter().sum())
    }
}

/// Paged item list returned by `GET /Items` and `GET /Library/MediaFolders`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ItemsResponse {
    pub items: Vec<BaseItem>,
    /// Absent on endpoints that do not paginate.
    pub total_record_count: Option<u64>,
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PlayState {
    pub position_ticks: Option<i64>,
    pub is_paused: bool,
    pub play_method: Option<String>,
}

/// An active client session as reported by `GET /sessions`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Session {
    pub id: String,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub client: Option<String>,
    pub device_name: Option<String>,
    pub device_id: Option<String>,
    pub application_version: Option<String>,
    pub remote_end_point: Option<String>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub last_activity_date: Option<Timestamp>,
    pub now_playing_item: Option<BaseItem>,
    pub play_state: PlayState,
}

impl Session {
    /// Whether this session is playing something that counts as activity.
    pub fn is_playing_media(&self) -> bool {
        self.now_playing_item
            .as_ref()
            .is_some_and(|item| !item.is_trailer())
    }
}

// ---------------------------------------------------------------------------
// Plugins
// ---------------------------------------------------------------------------

/// An installed server plugin.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Plugin {
    pub id: String,
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// Response of the Playback Reporting plugin's custom query endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomQueryResponse {
    /// Column names; the plugin spells the key `colums`.
    #[serde(alias = "colums")]
    pub columns: Vec<String>,
    pub results: Vec<Vec<serde_json::Value>>,
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Settings validation
// ---------------------------------------------------------------------------

/// Outcome of checking a server URL and API key.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SettingsValidation {
    pub is_valid: bool,
    pub status: u16,
    pub error_message: String,
    /// The URL exactly as supplied.
    pub url: String,
    /// The normalised API base URL.
    pub cleaned_url: String,
}
