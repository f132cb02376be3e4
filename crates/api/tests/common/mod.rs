#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use jellystat_api::auth::jwt::{issue_token, JwtConfig};
use jellystat_api::auth::password::hash_password;
use jellystat_api::config::{ServerConfig, TaskConfig};
use jellystat_api::router::build_app_router;
use jellystat_api::state::AppState;
use jellystat_db::repositories::AppUserRepo;
use jellystat_jellyfin::JellyfinSettings;

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(jellyfin: Option<JellyfinSettings>) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-jwt-secret".to_string(),
            access_token_expiry_mins: 60,
        },
        jellyfin,
        tasks: TaskConfig::default(),
    }
}

/// State for an app with no Jellyfin connection.
pub fn test_state(pool: PgPool) -> AppState {
    AppState::new(pool, test_config(None))
}

/// State for an app talking to the mock server at `host`.
pub fn test_state_with_jellyfin(pool: PgPool, host: &str) -> AppState {
    AppState::new(
        pool,
        test_config(Some(JellyfinSettings::new(host, TEST_API_KEY))),
    )
}

/// Build the full application router (same middleware stack as production).
pub fn build_app(state: AppState) -> Router {
    let config = state.config.as_ref().clone();
    build_app_router(state, &config)
}

pub fn build_test_app(pool: PgPool) -> Router {
    build_app(test_state(pool))
}

pub fn build_test_app_with_jellyfin(pool: PgPool, host: &str) -> Router {
    build_app(test_state_with_jellyfin(pool, host))
}

/// Create a dashboard account and return a valid bearer token for it.
pub async fn auth_token(pool: &PgPool) -> String {
    let hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    let user = AppUserRepo::create(pool, "admin", &hash)
        .await
        .expect("account creation should succeed");
    issue_token(user.id, &user.username, &test_config(None).jwt)
        .expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
