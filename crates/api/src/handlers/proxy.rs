//! Handlers for the `/proxy` resource: live reads from the Jellyfin server.
//!
//! Upstream failures are logged by the client and answered with an empty
//! list. Only a missing configuration is reported as an error (503).

use axum::extract::{Query, State};
use axum::Json;
use jellystat_core::error::CoreError;
use jellystat_jellyfin::models::{BaseItem, MediaSource, Plugin, Session, User};
use jellystat_jellyfin::JellyfinApi;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecentlyAddedQuery {
    #[serde(rename = "libraryid")]
    pub library_id: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct PlaybackInfoRequest {
    #[serde(rename = "itemid")]
    pub item_id: String,
    #[serde(rename = "userid")]
    pub user_id: Option<String>,
}

/// GET /proxy/getSessions
pub async fn get_sessions(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Session>>>> {
    let api = configured(&state)?;
    Ok(Json(DataResponse {
        data: api.get_sessions().await,
    }))
}

/// GET /proxy/getAdminUsers
pub async fn get_admin_users(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<User>>>> {
    let api = configured(&state)?;
    Ok(Json(DataResponse {
        data: api.get_admins().await,
    }))
}

/// GET /proxy/getRecentlyAdded?libraryid&limit
pub async fn get_recently_added(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<RecentlyAddedQuery>,
) -> AppResult<Json<DataResponse<Vec<BaseItem>>>> {
    let api = configured(&state)?;
    let items = api
        .get_recently_added(params.library_id.as_deref(), params.limit, None)
        .await;
    Ok(Json(DataResponse { data: items }))
}

/// GET /proxy/getPlugins
pub async fn get_plugins(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Plugin>>>> {
    let api = configured(&state)?;
    Ok(Json(DataResponse {
        data: api.get_installed_plugins().await,
    }))
}

/// POST /proxy/getPlaybackInfo
pub async fn get_playback_info(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<PlaybackInfoRequest>,
) -> AppResult<Json<DataResponse<Vec<MediaSource>>>> {
    if input.item_id.trim().is_empty() {
        return Err(CoreError::Validation("itemid is required".into()).into());
    }
    let api = configured(&state)?;
    let sources = api
        .get_item_info(&input.item_id, input.user_id.as_deref())
        .await;
    Ok(Json(DataResponse { data: sources }))
}

fn configured(state: &AppState) -> Result<&JellyfinApi, CoreError> {
    if !state.jellyfin.is_ready() {
        return Err(not_configured());
    }
    Ok(state.jellyfin.as_ref())
}

pub(crate) fn not_configured() -> CoreError {
    CoreError::NotConfigured("Set JF_HOST and JF_API_KEY to connect to Jellyfin".into())
}
