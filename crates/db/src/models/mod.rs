//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create/upsert DTO carrying the fields the sync writes
//!
//! Entities serialize with PascalCase keys, the casing the dashboard client
//! shares with the Jellyfin API.

pub mod activity;
pub mod app_user;
pub mod jellyfin_user;
pub mod library;
pub mod show;
pub mod stats;
