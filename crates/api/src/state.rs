use std::sync::Arc;

use jellystat_jellyfin::JellyfinApi;

use crate::background::sync_status::SyncTracker;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: jellystat_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Client for the configured Jellyfin server.
    pub jellyfin: Arc<JellyfinApi>,
    /// Progress of the running (or last) sync.
    pub sync: Arc<SyncTracker>,
}

impl AppState {
    pub fn new(pool: jellystat_db::DbPool, config: ServerConfig) -> Self {
        let jellyfin = Arc::new(JellyfinApi::new(config.jellyfin.clone()));
        Self {
            pool,
            config: Arc::new(config),
            jellyfin,
            sync: Arc::new(SyncTracker::default()),
        }
    }
}
