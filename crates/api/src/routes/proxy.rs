//! Route definitions for the `/proxy` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::proxy;
use crate::state::AppState;

/// Routes mounted at `/proxy`. All require auth.
///
/// ```text
/// GET  /getSessions       -> get_sessions
/// GET  /getAdminUsers     -> get_admin_users
/// GET  /getRecentlyAdded  -> get_recently_added
/// GET  /getPlugins        -> get_plugins
/// POST /getPlaybackInfo   -> get_playback_info
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/getSessions", get(proxy::get_sessions))
        .route("/getAdminUsers", get(proxy::get_admin_users))
        .route("/getRecentlyAdded", get(proxy::get_recently_added))
        .route("/getPlugins", get(proxy::get_plugins))
        .route("/getPlaybackInfo", post(proxy::get_playback_info))
}
