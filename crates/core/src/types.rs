/// Primary keys of locally owned tables are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Jellyfin identifies every entity (users, items, libraries) by an opaque
/// hex string.
pub type JellyfinId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
