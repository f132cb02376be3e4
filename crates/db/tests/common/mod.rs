//! Seed helpers shared by the repository tests.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use jellystat_db::models::activity::{CreatePlaybackActivity, PlaybackActivity, PlaybackSession};
use jellystat_db::models::library::{UpsertLibrary, UpsertLibraryItem};
use jellystat_db::models::show::{UpsertEpisode, UpsertSeason};
use jellystat_db::repositories::{ActivityRepo, EpisodeRepo, ItemRepo, LibraryRepo, SeasonRepo};
use sqlx::PgPool;

pub async fn seed_library(pool: &PgPool, id: &str, name: &str) {
    LibraryRepo::upsert(
        pool,
        &UpsertLibrary {
            id: id.into(),
            name: name.into(),
            server_id: Some("srv".into()),
            collection_type: Some("movies".into()),
            primary_image_tag: None,
        },
    )
    .await
    .unwrap();
}

pub async fn seed_item(pool: &PgPool, library_id: &str, id: &str, name: &str, item_type: &str) {
    ItemRepo::upsert(
        pool,
        &UpsertLibraryItem {
            id: id.into(),
            parent_id: library_id.into(),
            name: name.into(),
            item_type: Some(item_type.into()),
            production_year: Some(2001),
            community_rating: None,
            run_time_ticks: None,
            size_bytes: None,
            primary_image_hash: Some(format!("hash-{id}")),
            date_created: None,
        },
    )
    .await
    .unwrap();
}

pub async fn seed_season(pool: &PgPool, series_id: &str, id: &str, index: i32) {
    SeasonRepo::upsert(
        pool,
        &UpsertSeason {
            id: id.into(),
            series_id: series_id.into(),
            name: format!("Season {index}"),
            index_number: Some(index),
            primary_image_hash: None,
        },
    )
    .await
    .unwrap();
}

pub async fn seed_episode(
    pool: &PgPool,
    series_id: &str,
    season_id: &str,
    id: &str,
    name: &str,
    index: i32,
) {
    EpisodeRepo::upsert(
        pool,
        &UpsertEpisode {
            id: id.into(),
            series_id: series_id.into(),
            season_id: season_id.into(),
            name: name.into(),
            index_number: Some(index),
            parent_index_number: None,
            run_time_ticks: None,
            size_bytes: None,
            date_created: None,
        },
    )
    .await
    .unwrap();
}

/// Build a playback row for `item_id` that happened `minutes_ago`.
pub fn playback(user_id: &str, item_id: &str, minutes_ago: i64) -> CreatePlaybackActivity {
    CreatePlaybackActivity {
        session: PlaybackSession {
            session_id: Some("sess".into()),
            user_id: user_id.into(),
            user_name: Some(format!("name-{user_id}")),
            now_playing_item_id: item_id.into(),
            now_playing_item_name: Some(item_id.into()),
            ..Default::default()
        },
        playback_duration_secs: 120,
        plugin_row_id: None,
        activity_date_inserted: Utc::now() - Duration::minutes(minutes_ago),
    }
}

/// Build an episode playback row; `item_id` is the series.
pub fn episode_playback(
    user_id: &str,
    series_id: &str,
    season_id: &str,
    episode_id: &str,
    minutes_ago: i64,
) -> CreatePlaybackActivity {
    let mut input = playback(user_id, series_id, minutes_ago);
    input.session.season_id = Some(season_id.into());
    input.session.episode_id = Some(episode_id.into());
    input
}

pub async fn record(pool: &PgPool, input: CreatePlaybackActivity) -> PlaybackActivity {
    ActivityRepo::create(pool, &input).await.unwrap()
}
