//! Background tasks and scheduled jobs.
//!
//! Each long-running task is an async function intended to be spawned via
//! `tokio::spawn`. All of them accept a [`CancellationToken`] for graceful
//! shutdown.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

pub mod library_sync;
pub mod playback_watchdog;
pub mod plugin_import;
pub mod sync_status;

use jellystat_jellyfin::JellyfinApiError;

/// Failure of a sync or import run.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Jellyfin(#[from] JellyfinApiError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0} plugin is not installed")]
    PluginNotInstalled(&'static str),
}
