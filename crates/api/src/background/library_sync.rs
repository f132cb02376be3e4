//! Full library sync: mirror users, libraries, items, seasons and episodes
//! from Jellyfin into PostgreSQL.
//!
//! Rows that are no longer returned by the server are flagged `archived`
//! rather than deleted, so playback history keeps resolving. Every Jellyfin
//! call uses the `try_*` client methods: a failed call aborts the run instead
//! of being read as "the server has no items", which would archive the whole
//! catalogue.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use jellystat_db::models::jellyfin_user::UpsertJellyfinUser;
use jellystat_db::models::library::{UpsertLibrary, UpsertLibraryItem};
use jellystat_db::models::show::{UpsertEpisode, UpsertSeason};
use jellystat_db::repositories::{
    EpisodeRepo, ItemRepo, JellyfinUserRepo, LibraryRepo, SeasonRepo,
};
use jellystat_jellyfin::models::{BaseItem, User};
use jellystat_jellyfin::paging::PageParams;
use jellystat_jellyfin::JellyfinApi;
use serde::Serialize;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use super::sync_status::{SyncGuard, SyncTracker};
use super::SyncError;

/// Task name shown in the sync status.
pub const FULL_SYNC_TASK: &str = "Full Sync";

/// Item types synced through the series endpoints instead of as library items.
const CHILD_ITEM_TYPES: [&str; 2] = ["Season", "Episode"];

/// Counts from one sync run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub users: usize,
    pub libraries: usize,
    pub items: usize,
    pub seasons: usize,
    pub episodes: usize,
    /// Rows whose archived flag changed.
    pub archived: u64,
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Synced {} users, {} libraries, {} items, {} seasons, {} episodes ({} archive changes)",
            self.users, self.libraries, self.items, self.seasons, self.episodes, self.archived
        )
    }
}

/// Run the scheduled sync loop.
///
/// The first tick fires immediately. Ticks are skipped while Jellyfin is not
/// configured or another sync holds the tracker. Runs until `cancel` is
/// triggered.
pub async fn run(
    pool: PgPool,
    api: Arc<JellyfinApi>,
    tracker: Arc<SyncTracker>,
    every: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs = every.as_secs(), "Library sync job started");

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Library sync job stopping");
                break;
            }
            _ = interval.tick() => {
                if !api.is_ready() {
                    tracing::debug!("Library sync: Jellyfin not configured, skipping");
                    continue;
                }
                let Some(guard) = tracker.try_begin(FULL_SYNC_TASK) else {
                    tracing::debug!("Library sync: another sync is running, skipping");
                    continue;
                };
                run_tracked(&pool, &api, guard).await;
            }
        }
    }
}

/// Run one full sync and record its outcome on `guard`.
pub async fn run_tracked(pool: &PgPool, api: &JellyfinApi, guard: SyncGuard) {
    match sync_all(pool, api, &guard).await {
        Ok(report) => {
            tracing::info!(
                users = report.users,
                libraries = report.libraries,
                items = report.items,
                seasons = report.seasons,
                episodes = report.episodes,
                archived = report.archived,
                "Library sync finished"
            );
            guard.finish(true, report.to_string());
        }
        Err(e) => {
            tracing::error!(error = %e, "Library sync failed");
            guard.finish(false, e.to_string());
        }
    }
}

/// Sync users, then libraries, then each library's items and series children.
pub async fn sync_all(
    pool: &PgPool,
    api: &JellyfinApi,
    guard: &SyncGuard,
) -> Result<SyncReport, SyncError> {
    let mut report = SyncReport::default();

    // --- Users ---
    guard.progress("Syncing users");
    let users: Vec<User> = api
        .try_get_users()
        .await?
        .into_iter()
        .filter(|u| !u.id.is_empty())
        .collect();
    for user in &users {
        JellyfinUserRepo::upsert(pool, &to_user(user)).await?;
    }
    let user_ids: Vec<String> = users.iter().map(|u| u.id.clone()).collect();
    report.users = user_ids.len();
    report.archived += JellyfinUserRepo::archive_missing(pool, &user_ids).await?;

    // --- Libraries ---
    guard.progress("Syncing libraries");
    let libraries: Vec<BaseItem> = api
        .try_get_libraries()
        .await?
        .into_iter()
        .filter(|l| !l.id.is_empty())
        .collect();
    for library in &libraries {
        LibraryRepo::upsert(pool, &to_library(library)).await?;
    }
    let library_ids: Vec<String> = libraries.iter().map(|l| l.id.clone()).collect();
    report.libraries = library_ids.len();
    report.archived += LibraryRepo::archive_missing(pool, &library_ids).await?;

    // --- Items, seasons, episodes ---
    let mut item_ids = Vec::new();
    let mut season_ids = Vec::new();
    let mut episode_ids = Vec::new();

    for library in &libraries {
        let items = api
            .try_get_items_from_parent_id(&library.id, None, PageParams::default(), |page| {
                guard.progress(page.describe(&library.name))
            })
            .await?;

        for item in items.iter().filter(|i| is_library_item(i)) {
            ItemRepo::upsert(pool, &to_item(&library.id, item)).await?;
            item_ids.push(item.id.clone());

            if !item.is_series() {
                continue;
            }
            for season in api.try_get_seasons(&item.id).await? {
                SeasonRepo::upsert(pool, &to_season(&item.id, &season)).await?;
                for episode in api.try_get_episodes(&item.id, &season.id).await? {
                    EpisodeRepo::upsert(pool, &to_episode(&item.id, &season.id, &episode))
                        .await?;
                    episode_ids.push(episode.id);
                }
                season_ids.push(season.id);
            }
        }
    }

    report.items = item_ids.len();
    report.seasons = season_ids.len();
    report.episodes = episode_ids.len();
    report.archived += ItemRepo::archive_missing(pool, &item_ids).await?;
    report.archived += SeasonRepo::archive_missing(pool, &season_ids).await?;
    report.archived += EpisodeRepo::archive_missing(pool, &episode_ids).await?;

    Ok(report)
}

// ---------------------------------------------------------------------------
// Wire -> row conversions
// ---------------------------------------------------------------------------

fn is_library_item(item: &BaseItem) -> bool {
    !item.id.is_empty()
        && !item
            .item_type
            .as_deref()
            .is_some_and(|t| CHILD_ITEM_TYPES.contains(&t))
}

fn to_user(user: &User) -> UpsertJellyfinUser {
    UpsertJellyfinUser {
        id: user.id.clone(),
        name: user.name.clone(),
        is_administrator: user.is_admin(),
        primary_image_tag: user.primary_image_tag.clone(),
        last_login_date: user.last_login_date,
        last_activity_date: user.last_activity_date,
    }
}

fn to_library(library: &BaseItem) -> UpsertLibrary {
    UpsertLibrary {
        id: library.id.clone(),
        name: library.name.clone(),
        server_id: library.server_id.clone(),
        collection_type: library.collection_type.clone(),
        primary_image_tag: library.primary_image_tag().map(str::to_string),
    }
}

fn to_item(library_id: &str, item: &BaseItem) -> UpsertLibraryItem {
    UpsertLibraryItem {
        id: item.id.clone(),
        parent_id: library_id.to_string(),
        name: item.name.clone(),
        item_type: item.item_type.clone(),
        production_year: item.production_year,
        community_rating: item.community_rating,
        run_time_ticks: item.run_time_ticks,
        size_bytes: item.total_size(),
        primary_image_hash: item.primary_image_hash().map(str::to_string),
        date_created: item.date_created,
    }
}

fn to_season(series_id: &str, season: &BaseItem) -> UpsertSeason {
    UpsertSeason {
        id: season.id.clone(),
        series_id: series_id.to_string(),
        name: season.name.clone(),
        index_number: season.index_number,
        primary_image_hash: season.primary_image_hash().map(str::to_string),
    }
}

fn to_episode(series_id: &str, season_id: &str, episode: &BaseItem) -> UpsertEpisode {
    UpsertEpisode {
        id: episode.id.clone(),
        series_id: series_id.to_string(),
        season_id: season_id.to_string(),
        name: episode.name.clone(),
        index_number: episode.index_number,
        parent_index_number: episode.parent_index_number,
        run_time_ticks: episode.run_time_ticks,
        size_bytes: episode.total_size(),
        date_created: episode.date_created,
    }
}
