//! HTTP-level integration tests for the `/auth` endpoints and bearer auth.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json, TEST_PASSWORD};
use jellystat_db::repositories::AppUserRepo;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// First-run account creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_user_returns_token_when_no_account_exists(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let body = json!({ "username": "owner", "password": "long-enough-pw" });
    let response = post_json(app, "/auth/createuser", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert!(json["data"]["access_token"].is_string());
    assert_eq!(json["data"]["expires_in"], 3600);
    assert_eq!(json["data"]["user"]["username"], "owner");
    assert_eq!(AppUserRepo::count(&pool).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_user_is_forbidden_once_an_account_exists(pool: PgPool) {
    common::auth_token(&pool).await;
    let app = common::build_test_app(pool);

    let body = json!({ "username": "intruder", "password": "long-enough-pw" });
    let response = post_json(app, "/auth/createuser", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn concurrent_first_run_creates_one_account(pool: PgPool) {
    let first = post_json(
        common::build_test_app(pool.clone()),
        "/auth/createuser",
        json!({ "username": "alice", "password": TEST_PASSWORD }),
    );
    let second = post_json(
        common::build_test_app(pool.clone()),
        "/auth/createuser",
        json!({ "username": "bob", "password": TEST_PASSWORD }),
    );
    let (first, second) = tokio::join!(first, second);

    let mut statuses = [first.status(), second.status()];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::FORBIDDEN]);
    assert_eq!(AppUserRepo::count(&pool).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_user_rejects_short_password(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({ "username": "owner", "password": "short" });
    let response = post_json(app, "/auth/createuser", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_user_rejects_blank_username(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({ "username": "   ", "password": "long-enough-pw" });
    let response = post_json(app, "/auth/createuser", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn login_success_records_login(pool: PgPool) {
    common::auth_token(&pool).await;
    let app = common::build_test_app(pool.clone());

    let body = json!({ "username": "admin", "password": TEST_PASSWORD });
    let response = post_json(app, "/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["data"]["access_token"].is_string());
    assert_eq!(json["data"]["user"]["username"], "admin");

    let user = AppUserRepo::find_by_username(&pool, "admin")
        .await
        .unwrap()
        .unwrap();
    assert!(user.last_login_at.is_some());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_wrong_password_returns_401(pool: PgPool) {
    common::auth_token(&pool).await;
    let app = common::build_test_app(pool);

    let body = json!({ "username": "admin", "password": "not-the-password" });
    let response = post_json(app, "/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_unknown_user_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({ "username": "nobody", "password": TEST_PASSWORD });
    let response = post_json(app, "/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Setup state
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn is_configured_reflects_account_and_jellyfin(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/auth/isConfigured").await).await;
    assert_eq!(json["data"]["has_account"], false);
    assert_eq!(json["data"]["jellyfin_configured"], false);
    assert_eq!(json["data"]["is_configured"], false);

    common::auth_token(&pool).await;
    let app = common::build_test_app_with_jellyfin(pool, "http://127.0.0.1:9");
    let json = body_json(get(app, "/auth/isConfigured").await).await;
    assert_eq!(json["data"]["has_account"], true);
    assert_eq!(json["data"]["jellyfin_configured"], true);
    assert_eq!(json["data"]["is_configured"], true);
}

// ---------------------------------------------------------------------------
// Bearer auth
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn protected_route_requires_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/getLibraries").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn protected_route_rejects_garbage_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/getLibraries", "not.a.jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid or expired token");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn protected_route_accepts_valid_token(pool: PgPool) {
    let token = common::auth_token(&pool).await;
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/getLibraries", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}
