//! Import of historical plays recorded by the Jellyfin "Playback Reporting"
//! plugin.
//!
//! Rows are pulled through the plugin's custom-query endpoint, starting after
//! the highest plugin row id already imported, and inserted keyed on that row
//! id so an import can be repeated safely.

use chrono::{DateTime, NaiveDateTime, Utc};
use jellystat_core::types::Timestamp;
use jellystat_db::models::activity::{CreatePlaybackActivity, PlaybackSession};
use jellystat_db::repositories::{ActivityRepo, EpisodeRepo};
use jellystat_jellyfin::JellyfinApi;
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;

use super::sync_status::SyncGuard;
use super::SyncError;

/// Name the plugin registers under.
pub const PLUGIN_NAME: &str = "Playback Reporting";

/// Task name shown in the sync status.
pub const PLUGIN_SYNC_TASK: &str = "Playback Plugin Sync";

/// Counts from one import run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Rows returned by the plugin.
    pub fetched: usize,
    pub imported: usize,
    /// Rows already present or missing required fields.
    pub skipped: usize,
}

/// Fail with [`SyncError::PluginNotInstalled`] unless the plugin is present.
pub async fn ensure_plugin_installed(api: &JellyfinApi) -> Result<(), SyncError> {
    let installed = api
        .try_get_installed_plugins()
        .await?
        .iter()
        .any(|p| p.name == PLUGIN_NAME);
    if installed {
        Ok(())
    } else {
        Err(SyncError::PluginNotInstalled(PLUGIN_NAME))
    }
}

/// Import every plugin row newer than the last one imported.
pub async fn import_plugin_data(
    pool: &PgPool,
    api: &JellyfinApi,
    guard: &SyncGuard,
) -> Result<ImportReport, SyncError> {
    ensure_plugin_installed(api).await?;

    let after = ActivityRepo::max_plugin_row_id(pool).await?.unwrap_or(0);
    guard.progress(format!("Fetching plugin rows after {after}"));
    let rows = api.try_stats_submit_custom_query(&plugin_query(after)).await?;

    let mut report = ImportReport {
        fetched: rows.len(),
        ..Default::default()
    };

    for (n, row) in rows.iter().enumerate() {
        let Some(mut activity) = parse_row(row) else {
            report.skipped += 1;
            continue;
        };
        attribute_episode(pool, &mut activity).await?;

        if ActivityRepo::import(pool, &activity).await? {
            report.imported += 1;
        } else {
            report.skipped += 1;
        }
        if (n + 1) % 500 == 0 {
            guard.progress(format!("Imported {} of {}", n + 1, report.fetched));
        }
    }

    Ok(report)
}

/// Run an import and record its outcome on `guard`.
pub async fn run_tracked(pool: &PgPool, api: &JellyfinApi, guard: SyncGuard) {
    match import_plugin_data(pool, api, &guard).await {
        Ok(report) => {
            tracing::info!(
                fetched = report.fetched,
                imported = report.imported,
                skipped = report.skipped,
                "Playback plugin import finished"
            );
            guard.finish(
                true,
                format!(
                    "Imported {} of {} plugin rows",
                    report.imported, report.fetched
                ),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Playback plugin import failed");
            guard.finish(false, e.to_string());
        }
    }
}

/// The plugin stores plays in a SQLite table named `PlaybackActivity`.
fn plugin_query(after_row_id: i64) -> String {
    format!(
        "SELECT rowid, DateCreated, UserId, ItemId, ItemType, ItemName, PlaybackMethod, \
         ClientName, DeviceName, PlayDuration \
         FROM PlaybackActivity WHERE rowid > {after_row_id} ORDER BY rowid"
    )
}

/// Map one result row (columns in [`plugin_query`] order).
fn parse_row(row: &[Value]) -> Option<CreatePlaybackActivity> {
    let row_id = int(row.first()?)?;
    let date = parse_plugin_date(&text(row.get(1)?)?)?;
    let user_id = text(row.get(2)?)?;
    let item_id = text(row.get(3)?)?;
    let field = |i: usize| row.get(i).and_then(text);
    if field(4).as_deref() == Some("Trailer") {
        return None;
    }

    Some(CreatePlaybackActivity {
        session: PlaybackSession {
            user_id,
            now_playing_item_id: item_id,
            now_playing_item_name: field(5),
            play_method: field(6),
            client: field(7),
            device_name: field(8),
            ..Default::default()
        },
        playback_duration_secs: row.get(9).and_then(int).unwrap_or(0),
        plugin_row_id: Some(row_id),
        activity_date_inserted: date,
    })
}

/// The plugin records episodes by their own id; store them against the
/// series when the episode is known locally.
async fn attribute_episode(
    pool: &PgPool,
    activity: &mut CreatePlaybackActivity,
) -> Result<(), sqlx::Error> {
    let session = &mut activity.session;
    if let Some(episode) = EpisodeRepo::find_by_id(pool, &session.now_playing_item_id).await? {
        session.episode_id = Some(episode.id);
        session.season_id = Some(episode.season_id);
        session.now_playing_item_id = episode.series_id;
    }
    Ok(())
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Plugin dates look like `2024-01-02 03:04:05.1234567`; treated as UTC.
fn parse_plugin_date(raw: &str) -> Option<Timestamp> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
        })
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    use super::*;

    fn sample_row() -> Vec<Value> {
        vec![
            json!("17"),
            json!("2024-01-02 03:04:05.1234567"),
            json!("u1"),
            json!("m1"),
            json!("Movie"),
            json!("Alien"),
            json!("DirectPlay"),
            json!("Jellyfin Web"),
            json!("Firefox"),
            json!("5400"),
        ]
    }

    #[test]
    fn query_starts_after_last_row() {
        let query = plugin_query(42);
        assert!(query.contains("WHERE rowid > 42"));
        assert!(query.ends_with("ORDER BY rowid"));
    }

    #[test]
    fn row_maps_to_activity() {
        let activity = parse_row(&sample_row()).unwrap();
        assert_eq!(activity.plugin_row_id, Some(17));
        assert_eq!(activity.session.user_id, "u1");
        assert_eq!(activity.session.now_playing_item_id, "m1");
        assert_eq!(activity.session.now_playing_item_name.as_deref(), Some("Alien"));
        assert_eq!(activity.session.client.as_deref(), Some("Jellyfin Web"));
        assert_eq!(activity.playback_duration_secs, 5400);
        assert_eq!(activity.activity_date_inserted.year(), 2024);
        assert_eq!(activity.activity_date_inserted.hour(), 3);
    }

    #[test]
    fn numeric_cells_are_accepted() {
        let mut row = sample_row();
        row[0] = json!(18);
        row[9] = json!(60);
        let activity = parse_row(&row).unwrap();
        assert_eq!(activity.plugin_row_id, Some(18));
        assert_eq!(activity.playback_duration_secs, 60);
    }

    #[test]
    fn incomplete_or_trailer_rows_are_rejected() {
        let mut no_user = sample_row();
        no_user[2] = json!("");
        assert!(parse_row(&no_user).is_none());

        let mut bad_date = sample_row();
        bad_date[1] = json!("yesterday");
        assert!(parse_row(&bad_date).is_none());

        let mut trailer = sample_row();
        trailer[4] = json!("Trailer");
        assert!(parse_row(&trailer).is_none());

        assert!(parse_row(&[]).is_none());
    }
}
