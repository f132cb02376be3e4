//! HTTP-level integration tests for the `/stats` endpoints.

mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Duration, Timelike, Utc};
use common::{body_json, get_auth, post_json_auth};
use jellystat_core::stats::{hour_key, WEEKDAYS};
use jellystat_core::types::Timestamp;
use jellystat_db::models::activity::{CreatePlaybackActivity, PlaybackSession};
use jellystat_db::models::library::{UpsertLibrary, UpsertLibraryItem};
use jellystat_db::repositories::{ActivityRepo, ItemRepo, LibraryRepo};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_library(pool: &PgPool, id: &str, name: &str) {
    LibraryRepo::upsert(
        pool,
        &UpsertLibrary {
            id: id.into(),
            name: name.into(),
            server_id: None,
            collection_type: Some("movies".into()),
            primary_image_tag: None,
        },
    )
    .await
    .unwrap();
}

async fn seed_movie(pool: &PgPool, library_id: &str, id: &str) {
    ItemRepo::upsert(
        pool,
        &UpsertLibraryItem {
            id: id.into(),
            parent_id: library_id.into(),
            name: format!("Movie {id}"),
            item_type: Some("Movie".into()),
            production_year: None,
            community_rating: None,
            run_time_ticks: None,
            size_bytes: None,
            primary_image_hash: None,
            date_created: None,
        },
    )
    .await
    .unwrap();
}

/// Record a 5 minute play of `item_id` by `user_id`, `minutes_ago` minutes ago.
async fn record_play(
    pool: &PgPool,
    user_id: &str,
    item_id: &str,
    minutes_ago: i64,
) -> Timestamp {
    let input = CreatePlaybackActivity {
        session: PlaybackSession {
            session_id: Some("s1".into()),
            user_id: user_id.into(),
            user_name: Some(user_id.to_uppercase()),
            now_playing_item_id: item_id.into(),
            now_playing_item_name: Some(format!("Movie {item_id}")),
            ..Default::default()
        },
        playback_duration_secs: 300,
        plugin_row_id: None,
        activity_date_inserted: Utc::now() - Duration::minutes(minutes_ago),
    };
    ActivityRepo::create(pool, &input)
        .await
        .unwrap()
        .activity_date_inserted
}

// ---------------------------------------------------------------------------
// Views by hour / weekday
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn views_by_hour_is_zero_filled_per_library(pool: PgPool) {
    seed_library(&pool, "lib-m", "Movies").await;
    seed_library(&pool, "lib-k", "Kids").await;
    seed_movie(&pool, "lib-m", "m1").await;
    let played_at = record_play(&pool, "u1", "m1", 0).await;
    let token = common::auth_token(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(app, "/stats/getViewsByHour", json!({ "days": 7 }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, ["libraries", "stats"]);
    assert_eq!(json["libraries"], json!(["Kids", "Movies"]));

    let stats = json["stats"].as_array().unwrap();
    assert_eq!(stats.len(), 24);
    assert_eq!(stats[0]["Key"], "00:00");
    assert!(stats.iter().all(|b| b["Kids"] == 0));

    let total: i64 = stats.iter().map(|b| b["Movies"].as_i64().unwrap()).sum();
    assert_eq!(total, 1);
    let hour = &stats[played_at.hour() as usize];
    assert_eq!(hour["Key"], hour_key(played_at.hour()));
    assert_eq!(hour["Movies"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn views_by_days_uses_weekday_buckets(pool: PgPool) {
    seed_library(&pool, "lib-m", "Movies").await;
    seed_movie(&pool, "lib-m", "m1").await;
    let played_on = record_play(&pool, "u1", "m1", 60 * 24 * 2).await.weekday();
    let token = common::auth_token(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(app, "/stats/getViewsByDays", json!({}), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let stats = json["stats"].as_array().unwrap();
    let keys: Vec<_> = stats.iter().map(|b| b["Key"].as_str().unwrap()).collect();
    assert_eq!(keys, WEEKDAYS.to_vec());

    let total: i64 = stats.iter().map(|b| b["Movies"].as_i64().unwrap()).sum();
    assert_eq!(total, 1);
    assert_eq!(stats[played_on.num_days_from_sunday() as usize]["Movies"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn views_outside_window_are_not_counted(pool: PgPool) {
    seed_library(&pool, "lib-m", "Movies").await;
    seed_movie(&pool, "lib-m", "m1").await;
    record_play(&pool, "u1", "m1", 60 * 24 * 10).await;
    let token = common::auth_token(&pool).await;
    let app = common::build_test_app(pool);

    let json = body_json(
        post_json_auth(app, "/stats/getViewsByHour", json!({ "days": 3 }), &token).await,
    )
    .await;
    let stats = json["stats"].as_array().unwrap();
    assert!(stats.iter().all(|b| b["Movies"] == 0));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_days_is_rejected(pool: PgPool) {
    let token = common::auth_token(&pool).await;
    let app = common::build_test_app(pool);

    let response =
        post_json_auth(app, "/stats/getViewsByHour", json!({ "days": 0 }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Library stats
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn library_last_played_lists_recent_items(pool: PgPool) {
    seed_library(&pool, "lib-m", "Movies").await;
    seed_movie(&pool, "lib-m", "m1").await;
    seed_movie(&pool, "lib-m", "m2").await;
    record_play(&pool, "u1", "m1", 30).await;
    record_play(&pool, "u2", "m2", 5).await;
    let token = common::auth_token(&pool).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/stats/getLibraryLastPlayed?libraryid=lib-m", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["Id"], "m2");
    assert_eq!(rows[0]["UserName"], "U2");
    assert!(rows[0]["LastPlayed"].as_i64().unwrap() >= 5 * 60);
    assert!(rows[0].get("LastPlayedSecs").is_none());
    assert_eq!(rows[1]["Id"], "m1");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn library_last_played_requires_library_id(pool: PgPool) {
    let token = common::auth_token(&pool).await;
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/stats/getLibraryLastPlayed?libraryid=", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/stats/getLibraryLastPlayed", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn library_overview_counts_items_and_plays(pool: PgPool) {
    seed_library(&pool, "lib-m", "Movies").await;
    seed_movie(&pool, "lib-m", "m1").await;
    seed_movie(&pool, "lib-m", "m2").await;
    record_play(&pool, "u1", "m1", 10).await;
    record_play(&pool, "u1", "m1", 20).await;
    let token = common::auth_token(&pool).await;
    let app = common::build_test_app(pool);

    let json = body_json(get_auth(app, "/stats/getLibraryOverview", &token).await).await;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Name"], "Movies");
    assert_eq!(rows[0]["ItemCount"], 2);
    assert_eq!(rows[0]["PlayCount"], 2);
    assert_eq!(rows[0]["TotalPlaybackSecs"], 600);
}

// ---------------------------------------------------------------------------
// Users and activity
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn most_active_users_are_ranked_and_limited(pool: PgPool) {
    seed_library(&pool, "lib-m", "Movies").await;
    seed_movie(&pool, "lib-m", "m1").await;
    for minutes in [1, 2, 3] {
        record_play(&pool, "busy", "m1", minutes).await;
    }
    record_play(&pool, "casual", "m1", 4).await;
    record_play(&pool, "rare", "m1", 5).await;
    let token = common::auth_token(&pool).await;
    let app = common::build_test_app(pool);

    let body = json!({ "days": 30, "limit": 2 });
    let json = body_json(post_json_auth(app, "/stats/getMostActiveUsers", body, &token).await).await;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["UserId"], "busy");
    assert_eq!(rows[0]["Plays"], 3);
    assert_eq!(rows[1]["UserId"], "casual");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn playback_activity_is_paged_newest_first(pool: PgPool) {
    for minutes in [30, 20, 10] {
        record_play(&pool, "u1", &format!("m{minutes}"), minutes).await;
    }
    let token = common::auth_token(&pool).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/stats/getPlaybackActivity?limit=2&offset=0", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["total"], 3);
    assert_eq!(json["limit"], 2);
    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["NowPlayingItemId"], "m10");
    assert_eq!(items[1]["NowPlayingItemId"], "m20");
}
