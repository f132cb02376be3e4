//! Route definitions for the `/api` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Routes mounted at `/api`. All require auth.
///
/// ```text
/// GET  /getLibraries      -> get_libraries
/// GET  /getLibraryItems   -> get_library_items
/// GET  /getSeasons        -> get_seasons
/// GET  /getEpisodes       -> get_episodes
/// GET  /getUsers          -> get_users
/// POST /validateSettings  -> validate_settings
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/getLibraries", get(catalog::get_libraries))
        .route("/getLibraryItems", get(catalog::get_library_items))
        .route("/getSeasons", get(catalog::get_seasons))
        .route("/getEpisodes", get(catalog::get_episodes))
        .route("/getUsers", get(catalog::get_users))
        .route("/validateSettings", post(catalog::validate_settings))
}
