//! Handlers for the `/stats` resource: aggregated playback statistics.
//!
//! All endpoints require authentication via [`AuthUser`]. Payloads are served
//! bare, without the `data` envelope, as the dashboard charts read them.

use axum::extract::{Query, State};
use axum::Json;
use jellystat_core::error::CoreError;
use jellystat_core::stats::{
    build_buckets, hour_keys, resolve_days, weekday_keys, BucketCount, ChartBucket,
};
use jellystat_db::models::activity::PlaybackActivity;
use jellystat_db::models::stats::{ActiveUser, LibraryBucketCount, LibraryLastPlayed, LibraryOverview};
use jellystat_db::repositories::{ActivityRepo, StatsRepo};
use jellystat_db::{clamp_limit, clamp_offset};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Default number of users returned by `getMostActiveUsers`.
const DEFAULT_ACTIVE_USERS: i64 = 5;
const MAX_ACTIVE_USERS: i64 = 100;

/// Default page size for `getPlaybackActivity`.
const DEFAULT_ACTIVITY_PAGE: i64 = 50;
const MAX_ACTIVITY_PAGE: i64 = 500;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct DaysRequest {
    pub days: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActiveUsersRequest {
    pub days: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct LibraryQuery {
    #[serde(rename = "libraryid")]
    pub library_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Per-library chart: one bucket per hour or weekday, one count per library.
#[derive(Debug, Serialize)]
pub struct ViewsChart {
    pub libraries: Vec<String>,
    pub stats: Vec<ChartBucket>,
}

#[derive(Debug, Serialize)]
pub struct ActivityPage {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub items: Vec<PlaybackActivity>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /stats/getViewsByHour
pub async fn views_by_hour(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<DaysRequest>,
) -> AppResult<Json<ViewsChart>> {
    let days = resolve_days(input.days)?;
    let libraries = StatsRepo::library_names(&state.pool).await?;
    let rows = StatsRepo::views_by_hour(&state.pool, days).await?;
    Ok(Json(chart(hour_keys(), libraries, rows)))
}

/// POST /stats/getViewsByDays
pub async fn views_by_days(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<DaysRequest>,
) -> AppResult<Json<ViewsChart>> {
    let days = resolve_days(input.days)?;
    let libraries = StatsRepo::library_names(&state.pool).await?;
    let rows = StatsRepo::views_by_weekday(&state.pool, days).await?;
    Ok(Json(chart(weekday_keys(), libraries, rows)))
}

/// GET /stats/getLibraryLastPlayed?libraryid=
pub async fn library_last_played(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<LibraryQuery>,
) -> AppResult<Json<Vec<LibraryLastPlayed>>> {
    if params.library_id.trim().is_empty() {
        return Err(CoreError::Validation("libraryid is required".into()).into());
    }
    let rows = StatsRepo::last_library_activity(&state.pool, &params.library_id).await?;
    Ok(Json(rows))
}

/// GET /stats/getLibraryOverview
pub async fn library_overview(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<LibraryOverview>>> {
    let rows = StatsRepo::library_overview(&state.pool).await?;
    Ok(Json(rows))
}

/// POST /stats/getMostActiveUsers
pub async fn most_active_users(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ActiveUsersRequest>,
) -> AppResult<Json<Vec<ActiveUser>>> {
    let days = resolve_days(input.days)?;
    let limit = clamp_limit(input.limit, DEFAULT_ACTIVE_USERS, MAX_ACTIVE_USERS);
    let rows = StatsRepo::most_active_users(&state.pool, days, limit).await?;
    Ok(Json(rows))
}

/// GET /stats/getPlaybackActivity?limit&offset
pub async fn playback_activity(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<ActivityPage>> {
    let limit = clamp_limit(params.limit, DEFAULT_ACTIVITY_PAGE, MAX_ACTIVITY_PAGE);
    let offset = clamp_offset(params.offset);

    let items = ActivityRepo::list_recent(&state.pool, limit, offset).await?;
    let total = ActivityRepo::count(&state.pool).await?;

    Ok(Json(ActivityPage {
        total,
        limit,
        offset,
        items,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn chart(keys: Vec<String>, libraries: Vec<String>, rows: Vec<LibraryBucketCount>) -> ViewsChart {
    let counts = rows.into_iter().filter_map(|row| {
        Some(BucketCount {
            bucket: usize::try_from(row.bucket).ok()?,
            series: row.library_name,
            count: row.plays,
        })
    });
    let stats = build_buckets(keys, &libraries, counts);
    ViewsChart { libraries, stats }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_zero_fills_every_library() {
        let rows = vec![LibraryBucketCount {
            bucket: 2,
            library_name: "Movies".into(),
            plays: 4,
        }];
        let chart = chart(
            weekday_keys(),
            vec!["Movies".into(), "Shows".into()],
            rows,
        );

        assert_eq!(chart.stats.len(), 7);
        assert_eq!(chart.stats[2].counts["Movies"], 4);
        assert_eq!(chart.stats[2].counts["Shows"], 0);
        assert_eq!(chart.stats[0].counts["Movies"], 0);
    }

    #[test]
    fn negative_buckets_are_dropped() {
        let rows = vec![LibraryBucketCount {
            bucket: -1,
            library_name: "Movies".into(),
            plays: 4,
        }];
        let chart = chart(hour_keys(), vec!["Movies".into()], rows);
        assert!(chart.stats.iter().all(|b| b.counts["Movies"] == 0));
    }
}
