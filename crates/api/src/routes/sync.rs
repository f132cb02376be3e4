//! Route definitions for the `/sync` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::sync;
use crate::state::AppState;

/// Routes mounted at `/sync`. All require auth.
///
/// ```text
/// POST /beginSync               -> begin_sync
/// POST /syncPlaybackPluginData  -> sync_playback_plugin_data
/// GET  /status                  -> status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/beginSync", post(sync::begin_sync))
        .route(
            "/syncPlaybackPluginData",
            post(sync::sync_playback_plugin_data),
        )
        .route("/status", get(sync::status))
}
