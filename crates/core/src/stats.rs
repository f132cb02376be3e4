//! Shapes and helpers for the dashboard's chart statistics.
//!
//! Charts receive one [`ChartBucket`] per x-axis position (hour of day, day of
//! week) with a play count for every library, zero-filled so that every
//! series has a point at every position.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::CoreError;

/// Look-back window used when the dashboard does not send one.
pub const DEFAULT_STATS_DAYS: i64 = 30;

/// Upper bound on the look-back window (roughly ten years).
pub const MAX_STATS_DAYS: i64 = 3650;

/// Number of rows `fs_last_library_activity` returns at most.
pub const LAST_ACTIVITY_LIMIT: usize = 15;

/// Day-of-week labels indexed by PostgreSQL `EXTRACT(DOW ...)` (0 = Sunday).
pub const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Resolve the requested look-back window in days.
///
/// `None` falls back to [`DEFAULT_STATS_DAYS`]; values outside
/// `1..=MAX_STATS_DAYS` are rejected.
pub fn resolve_days(days: Option<i64>) -> Result<i64, CoreError> {
    let days = days.unwrap_or(DEFAULT_STATS_DAYS);
    if !(1..=MAX_STATS_DAYS).contains(&days) {
        return Err(CoreError::Validation(format!(
            "days must be between 1 and {MAX_STATS_DAYS}, got {days}"
        )));
    }
    Ok(days)
}

/// Chart label for an hour of the day, e.g. `7` -> `"07:00"`.
pub fn hour_key(hour: u32) -> String {
    format!("{hour:02}:00")
}

/// Labels for the 24 hour-of-day buckets.
pub fn hour_keys() -> Vec<String> {
    (0..24).map(hour_key).collect()
}

/// Labels for the 7 day-of-week buckets, Sunday first.
pub fn weekday_keys() -> Vec<String> {
    WEEKDAYS.iter().map(|d| (*d).to_string()).collect()
}

/// One x-axis position of a per-library chart.
///
/// Serializes as `{ "Key": "07:00", "Movies": 3, "Shows": 0, ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartBucket {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(flatten)]
    pub counts: BTreeMap<String, i64>,
}

/// A single aggregated count: bucket index, series name, plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketCount {
    pub bucket: usize,
    pub series: String,
    pub count: i64,
}

/// Build zero-filled chart buckets.
///
/// Every bucket gets an entry for each name in `series`; counts for the same
/// `(bucket, series)` pair are summed. Counts whose bucket index is out of
/// range are ignored, counts for unknown series are kept.
pub fn build_buckets(
    keys: Vec<String>,
    series: &[String],
    counts: impl IntoIterator<Item = BucketCount>,
) -> Vec<ChartBucket> {
    let mut buckets: Vec<ChartBucket> = keys
        .into_iter()
        .map(|key| ChartBucket {
            key,
            counts: series.iter().map(|s| (s.clone(), 0)).collect(),
        })
        .collect();

    for c in counts {
        if let Some(bucket) = buckets.get_mut(c.bucket) {
            *bucket.counts.entry(c.series).or_insert(0) += c.count;
        }
    }

    buckets
}
