//! Jellyfin user accounts mirrored by the sync.

use jellystat_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct JellyfinUser {
    pub id: String,
    pub name: String,
    pub is_administrator: bool,
    pub primary_image_tag: Option<String>,
    pub last_login_date: Option<Timestamp>,
    pub last_activity_date: Option<Timestamp>,
    pub archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct UpsertJellyfinUser {
    pub id: String,
    pub name: String,
    pub is_administrator: bool,
    pub primary_image_tag: Option<String>,
    pub last_login_date: Option<Timestamp>,
    pub last_activity_date: Option<Timestamp>,
}
