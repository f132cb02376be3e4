//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /login         -> login
/// POST /createuser    -> create_user (only while no account exists)
/// GET  /isConfigured  -> is_configured
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/createuser", post(auth::create_user))
        .route("/isConfigured", get(auth::is_configured))
}
