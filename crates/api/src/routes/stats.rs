//! Route definitions for the `/stats` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::stats;
use crate::state::AppState;

/// Routes mounted at `/stats`. All require auth.
///
/// ```text
/// POST /getViewsByHour        -> views_by_hour
/// POST /getViewsByDays        -> views_by_days
/// GET  /getLibraryLastPlayed  -> library_last_played
/// GET  /getLibraryOverview    -> library_overview
/// POST /getMostActiveUsers    -> most_active_users
/// GET  /getPlaybackActivity   -> playback_activity
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/getViewsByHour", post(stats::views_by_hour))
        .route("/getViewsByDays", post(stats::views_by_days))
        .route("/getLibraryLastPlayed", get(stats::library_last_played))
        .route("/getLibraryOverview", get(stats::library_overview))
        .route("/getMostActiveUsers", post(stats::most_active_users))
        .route("/getPlaybackActivity", get(stats::playback_activity))
}
