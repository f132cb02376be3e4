//! Handlers for the `/auth` resource (first-run account creation and login).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use jellystat_core::error::CoreError;
use jellystat_core::types::DbId;
use jellystat_db::repositories::AppUserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::issue_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login` and `POST /auth/createuser`.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
}

/// Response of `GET /auth/isConfigured`.
#[derive(Debug, Serialize)]
pub struct ConfigState {
    /// A dashboard account exists.
    pub has_account: bool,
    /// `JF_HOST` and `JF_API_KEY` are set.
    pub jellyfin_configured: bool,
    pub is_configured: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<Credentials>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let invalid =
        || AppError::Core(CoreError::Unauthorized("Invalid username or password".into()));

    let user = AppUserRepo::find_by_username(&state.pool, input.username.trim())
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid());
    }

    AppUserRepo::record_login(&state.pool, user.id).await?;
    tracing::info!(user_id = user.id, "Dashboard login");

    let response = auth_response(&state, user.id, &user.username)?;
    Ok(Json(DataResponse { data: response }))
}

/// POST /auth/createuser
///
/// Creates the dashboard account. Only allowed while no account exists.
///
/// The early count answers the common case cheaply; the insert itself is
/// guarded so concurrent first-run requests create a single account.
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<Credentials>,
) -> AppResult<(StatusCode, Json<DataResponse<AuthResponse>>)> {
    if AppUserRepo::count(&state.pool).await? > 0 {
        return Err(account_exists());
    }

    let username = input.username.trim();
    if username.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Username must not be empty".into(),
        )));
    }
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let user = AppUserRepo::create_first(&state.pool, username, &password_hash)
        .await?
        .ok_or_else(account_exists)?;
    tracing::info!(user_id = user.id, username = %user.username, "Dashboard account created");

    let response = auth_response(&state, user.id, &user.username)?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// GET /auth/isConfigured
pub async fn is_configured(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ConfigState>>> {
    let has_account = AppUserRepo::count(&state.pool).await? > 0;
    let jellyfin_configured = state.jellyfin.is_ready();

    Ok(Json(DataResponse {
        data: ConfigState {
            has_account,
            jellyfin_configured,
            is_configured: has_account && jellyfin_configured,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn account_exists() -> AppError {
    AppError::Core(CoreError::Forbidden(
        "An account has already been created".into(),
    ))
}

fn auth_response(state: &AppState, user_id: DbId, username: &str) -> AppResult<AuthResponse> {
    let access_token = issue_token(user_id, username, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(AuthResponse {
        access_token,
        expires_in: state.config.jwt.expires_in_secs(),
        user: UserInfo {
            id: user_id,
            username: username.to_string(),
        },
    })
}
