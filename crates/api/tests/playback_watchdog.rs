//! Integration tests for the playback watchdog poll against a mock
//! `/sessions` endpoint.

use jellystat_api::background::playback_watchdog::poll_once;
use jellystat_db::repositories::{ActivityRepo, WatchdogRepo};
use jellystat_jellyfin::{JellyfinApi, JellyfinSettings};
use serde_json::json;
use sqlx::PgPool;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> JellyfinApi {
    JellyfinApi::new(Some(JellyfinSettings::new(&server.uri(), "test-api-key")))
}

async fn serve_sessions(server: &MockServer, body: serde_json::Value) {
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn episode_session() -> serde_json::Value {
    json!([{
        "Id": "s1",
        "UserId": "u1",
        "UserName": "alice",
        "Client": "Jellyfin Web",
        "NowPlayingItem": {
            "Id": "ep-1", "Name": "Pilot", "Type": "Episode",
            "SeriesId": "ser-1", "SeasonId": "sea-1"
        },
        "PlayState": { "IsPaused": false, "PlayMethod": "Transcode" }
    }])
}

#[sqlx::test(migrations = "../db/migrations")]
async fn session_is_tracked_then_recorded_when_it_ends(pool: PgPool) {
    let server = MockServer::start().await;
    let api = client_for(&server);

    serve_sessions(&server, episode_session()).await;
    let report = poll_once(&pool, &api, 0).await.unwrap();
    assert_eq!(report.active, 1);
    assert_eq!(report.recorded, 0);

    let tracked = WatchdogRepo::list(&pool).await.unwrap();
    assert_eq!(tracked.len(), 1);

    serve_sessions(&server, json!([])).await;
    let report = poll_once(&pool, &api, 0).await.unwrap();
    assert_eq!(report.active, 0);
    assert_eq!(report.recorded, 1);

    assert!(WatchdogRepo::list(&pool).await.unwrap().is_empty());
    let rows = ActivityRepo::list_recent(&pool, 10, 0).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].now_playing_item_id, "ser-1");
    assert_eq!(rows[0].episode_id.as_deref(), Some("ep-1"));
    assert_eq!(rows[0].season_id.as_deref(), Some("sea-1"));
    assert_eq!(rows[0].play_method.as_deref(), Some("Transcode"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn next_episode_of_same_series_is_a_separate_play(pool: PgPool) {
    let server = MockServer::start().await;
    let api = client_for(&server);

    serve_sessions(&server, episode_session()).await;
    poll_once(&pool, &api, 0).await.unwrap();

    let mut next = episode_session();
    next[0]["NowPlayingItem"]["Id"] = json!("ep-2");
    next[0]["NowPlayingItem"]["Name"] = json!("Second");
    serve_sessions(&server, next).await;
    let report = poll_once(&pool, &api, 0).await.unwrap();
    assert_eq!(report.active, 1);
    assert_eq!(report.recorded, 1);

    let tracked = WatchdogRepo::list(&pool).await.unwrap();
    assert_eq!(tracked.len(), 1);
    assert_eq!(tracked[0].episode_id.as_deref(), Some("ep-2"));
    assert_eq!(tracked[0].playback_duration_secs, 0);

    serve_sessions(&server, json!([])).await;
    let report = poll_once(&pool, &api, 0).await.unwrap();
    assert_eq!(report.recorded, 1);

    let rows = ActivityRepo::list_recent(&pool, 10, 0).await.unwrap();
    let mut episodes: Vec<_> = rows.iter().filter_map(|r| r.episode_id.as_deref()).collect();
    episodes.sort_unstable();
    assert_eq!(episodes, ["ep-1", "ep-2"]);
    assert!(rows.iter().all(|r| r.now_playing_item_id == "ser-1"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn short_plays_are_discarded(pool: PgPool) {
    let server = MockServer::start().await;
    let api = client_for(&server);

    serve_sessions(&server, episode_session()).await;
    poll_once(&pool, &api, 3600).await.unwrap();

    serve_sessions(&server, json!([])).await;
    let report = poll_once(&pool, &api, 3600).await.unwrap();
    assert_eq!(report.recorded, 0);
    assert_eq!(report.discarded, 1);
    assert_eq!(ActivityRepo::count(&pool).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn failed_poll_keeps_sessions_open(pool: PgPool) {
    let server = MockServer::start().await;
    let api = client_for(&server);

    serve_sessions(&server, episode_session()).await;
    poll_once(&pool, &api, 0).await.unwrap();

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    assert!(poll_once(&pool, &api, 0).await.is_err());
    assert_eq!(WatchdogRepo::list(&pool).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unreadable_sessions_keep_sessions_open(pool: PgPool) {
    let server = MockServer::start().await;
    let api = client_for(&server);

    serve_sessions(&server, episode_session()).await;
    poll_once(&pool, &api, 0).await.unwrap();

    serve_sessions(&server, json!([{ "Id": "s1", "NowPlayingItem": 42 }])).await;
    assert!(poll_once(&pool, &api, 0).await.is_err());
    assert_eq!(WatchdogRepo::list(&pool).await.unwrap().len(), 1);
    assert_eq!(ActivityRepo::count(&pool).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unconfigured_client_is_a_no_op(pool: PgPool) {
    let api = JellyfinApi::new(None);
    let report = poll_once(&pool, &api, 0).await.unwrap();
    assert_eq!(report.active, 0);
    assert_eq!(report.recorded, 0);
}
