//! Seasons and episodes of a series.

use jellystat_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Season {
    pub id: String,
    pub series_id: String,
    pub name: String,
    pub index_number: Option<i32>,
    pub primary_image_hash: Option<String>,
    pub archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct UpsertSeason {
    pub id: String,
    pub series_id: String,
    pub name: String,
    pub index_number: Option<i32>,
    pub primary_image_hash: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Episode {
    pub id: String,
    pub series_id: String,
    pub season_id: String,
    pub name: String,
    pub index_number: Option<i32>,
    pub parent_index_number: Option<i32>,
    pub run_time_ticks: Option<i64>,
    pub size_bytes: Option<i64>,
    pub date_created: Option<Timestamp>,
    pub archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct UpsertEpisode {
    pub id: String,
    pub series_id: String,
    pub season_id: String,
    pub name: String,
    pub index_number: Option<i32>,
    pub parent_index_number: Option<i32>,
    pub run_time_ticks: Option<i64>,
    pub size_bytes: Option<i64>,
    pub date_created: Option<Timestamp>,
}
