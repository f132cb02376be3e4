//! Handlers for the `/api` resource: the synced catalogue and settings checks.

use axum::extract::{Query, State};
use axum::Json;
use jellystat_core::error::CoreError;
use jellystat_db::models::jellyfin_user::JellyfinUser;
use jellystat_db::models::library::{Library, LibraryItem};
use jellystat_db::models::show::{Episode, Season};
use jellystat_db::repositories::{EpisodeRepo, ItemRepo, JellyfinUserRepo, LibraryRepo, SeasonRepo};
use jellystat_jellyfin::models::SettingsValidation;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LibraryQuery {
    #[serde(rename = "libraryid")]
    pub library_id: String,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct ValidateSettingsRequest {
    pub url: String,
    #[serde(rename = "apikey")]
    pub api_key: String,
}

/// GET /api/getLibraries
pub async fn get_libraries(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Library>>>> {
    let libraries = LibraryRepo::list(&state.pool, false).await?;
    Ok(Json(DataResponse { data: libraries }))
}

/// GET /api/getLibraryItems?libraryid=
pub async fn get_library_items(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<LibraryQuery>,
) -> AppResult<Json<DataResponse<Vec<LibraryItem>>>> {
    LibraryRepo::find_by_id(&state.pool, &params.library_id)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "Library",
            id: params.library_id.clone(),
        })?;

    let items = ItemRepo::list_by_library(&state.pool, &params.library_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/getSeasons?id={series_id}
pub async fn get_seasons(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IdQuery>,
) -> AppResult<Json<DataResponse<Vec<Season>>>> {
    let seasons = SeasonRepo::list_by_series(&state.pool, &params.id).await?;
    Ok(Json(DataResponse { data: seasons }))
}

/// GET /api/getEpisodes?id={season_id}
pub async fn get_episodes(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IdQuery>,
) -> AppResult<Json<DataResponse<Vec<Episode>>>> {
    let episodes = EpisodeRepo::list_by_season(&state.pool, &params.id).await?;
    Ok(Json(DataResponse { data: episodes }))
}

/// GET /api/getUsers
pub async fn get_users(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<JellyfinUser>>>> {
    let users = JellyfinUserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}

/// POST /api/validateSettings
///
/// Always answers 200; the outcome is carried in [`SettingsValidation`].
pub async fn validate_settings(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ValidateSettingsRequest>,
) -> AppResult<Json<DataResponse<SettingsValidation>>> {
    let result = state
        .jellyfin
        .validate_settings(&input.url, &input.api_key)
        .await;
    Ok(Json(DataResponse { data: result }))
}
