pub mod auth;
pub mod catalog;
pub mod health;
pub mod proxy;
pub mod stats;
pub mod sync;

use axum::Router;

use crate::state::AppState;

/// Build the dashboard route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/createuser                                 first account (public)
/// /auth/isConfigured                               setup state (public)
///
/// /stats/getViewsByHour                            plays per hour and library (POST)
/// /stats/getViewsByDays                            plays per weekday and library (POST)
/// /stats/getLibraryLastPlayed?libraryid=           last played items of a library
/// /stats/getLibraryOverview                        per-library counts
/// /stats/getMostActiveUsers                        users ranked by plays (POST)
/// /stats/getPlaybackActivity?limit&offset          recent activity, paged
///
/// /api/getLibraries                                stored libraries
/// /api/getLibraryItems?libraryid=                  stored items of a library
/// /api/getSeasons?id=                              stored seasons of a series
/// /api/getEpisodes?id=                             stored episodes of a season
/// /api/getUsers                                    stored Jellyfin users
/// /api/validateSettings                            check a URL and API key (POST)
///
/// /proxy/getSessions                               live sessions
/// /proxy/getAdminUsers                             live administrators
/// /proxy/getRecentlyAdded?libraryid&limit          live latest items
/// /proxy/getPlugins                                installed plugins
/// /proxy/getPlaybackInfo                           media sources of an item (POST)
///
/// /sync/beginSync                                  start a full sync (POST)
/// /sync/syncPlaybackPluginData                     import plugin history (POST)
/// /sync/status                                     current sync state
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/stats", stats::router())
        .nest("/api", catalog::router())
        .nest("/proxy", proxy::router())
        .nest("/sync", sync::router())
}
