//! Handlers for the `/sync` resource.
//!
//! Sync jobs run on a spawned task; the request returns `202 Accepted` with
//! the tracker snapshot. Only one job runs at a time.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use jellystat_core::error::CoreError;

use crate::background::sync_status::{SyncGuard, SyncStatus};
use crate::background::{library_sync, plugin_import};
use crate::error::AppResult;
use crate::handlers::proxy::not_configured;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /sync/beginSync
pub async fn begin_sync(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<DataResponse<SyncStatus>>)> {
    if !state.jellyfin.is_ready() {
        return Err(not_configured().into());
    }
    let guard = begin(&state, library_sync::FULL_SYNC_TASK)?;
    tracing::info!(user_id = user.user_id, "Manual library sync requested");

    let pool = state.pool.clone();
    let api = Arc::clone(&state.jellyfin);
    tokio::spawn(async move {
        library_sync::run_tracked(&pool, &api, guard).await;
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: state.sync.snapshot(),
        }),
    ))
}

/// POST /sync/syncPlaybackPluginData
///
/// Answers 404 when the Playback Reporting plugin is not installed.
pub async fn sync_playback_plugin_data(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<DataResponse<SyncStatus>>)> {
    if !state.jellyfin.is_ready() {
        return Err(not_configured().into());
    }
    plugin_import::ensure_plugin_installed(&state.jellyfin).await?;
    let guard = begin(&state, plugin_import::PLUGIN_SYNC_TASK)?;
    tracing::info!(user_id = user.user_id, "Playback plugin import requested");

    let pool = state.pool.clone();
    let api = Arc::clone(&state.jellyfin);
    tokio::spawn(async move {
        plugin_import::run_tracked(&pool, &api, guard).await;
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: state.sync.snapshot(),
        }),
    ))
}

/// GET /sync/status
pub async fn status(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<SyncStatus>>> {
    Ok(Json(DataResponse {
        data: state.sync.snapshot(),
    }))
}

fn begin(state: &AppState, task: &str) -> Result<SyncGuard, CoreError> {
    state.sync.try_begin(task).ok_or_else(|| {
        let running = state.sync.snapshot().task.unwrap_or_default();
        CoreError::Conflict(format!("{running} is already running"))
    })
}
