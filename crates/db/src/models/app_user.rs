//! Dashboard login accounts.

use jellystat_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A dashboard account. Never serialized: it carries the password hash.
#[derive(Debug, Clone, FromRow)]
pub struct AppUser {
    pub id: DbId,
    pub username: String,
    pub password_hash: String,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
