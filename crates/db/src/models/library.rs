//! Libraries and their top-level items (movies, series, albums, ...).

use jellystat_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Libraries
// ---------------------------------------------------------------------------

/// A Jellyfin media folder.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Library {
    pub id: String,
    pub name: String,
    pub server_id: Option<String>,
    pub collection_type: Option<String>,
    pub primary_image_tag: Option<String>,
    pub archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting or refreshing a library.
#[derive(Debug, Clone)]
pub struct UpsertLibrary {
    pub id: String,
    pub name: String,
    pub server_id: Option<String>,
    pub collection_type: Option<String>,
    pub primary_image_tag: Option<String>,
}

// ---------------------------------------------------------------------------
// Library items
// ---------------------------------------------------------------------------

/// A top-level item inside a library.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LibraryItem {
    pub id: String,
    pub parent_id: String,
    pub name: String,
    #[serde(rename = "Type")]
    pub item_type: Option<String>,
    pub production_year: Option<i32>,
    pub community_rating: Option<f64>,
    pub run_time_ticks: Option<i64>,
    pub size_bytes: Option<i64>,
    pub primary_image_hash: Option<String>,
    pub date_created: Option<Timestamp>,
    pub archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting or refreshing a library item.
#[derive(Debug, Clone)]
pub struct UpsertLibraryItem {
    pub id: String,
    pub parent_id: String,
    pub name: String,
    pub item_type: Option<String>,
    pub production_year: Option<i32>,
    pub community_rating: Option<f64>,
    pub run_time_ticks: Option<i64>,
    pub size_bytes: Option<i64>,
    pub primary_image_hash: Option<String>,
    pub date_created: Option<Timestamp>,
}
