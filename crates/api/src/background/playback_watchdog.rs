//! Session polling: turns live Jellyfin sessions into playback history.
//!
//! Each poll upserts every playing (session, item) pair into the watchdog
//! table, accumulating unpaused time. Pairs that a poll no longer reports
//! have ended and are moved into `jf_playback_activity`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jellystat_db::models::activity::PlaybackSession;
use jellystat_db::repositories::WatchdogRepo;
use jellystat_jellyfin::models::Session;
use jellystat_jellyfin::JellyfinApi;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use super::SyncError;

/// Item type whose plays are attributed to the parent series.
const EPISODE_ITEM_TYPE: &str = "Episode";

/// Counts from a single poll.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollReport {
    pub active: usize,
    pub recorded: usize,
    pub discarded: usize,
}

/// Run the polling loop until `cancel` is triggered.
pub async fn run(
    pool: PgPool,
    api: Arc<JellyfinApi>,
    every: Duration,
    min_playback_secs: i64,
    cancel: CancellationToken,
) {
    tracing::info!(
        interval_secs = every.as_secs(),
        min_playback_secs,
        "Playback watchdog started"
    );

    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Playback watchdog stopping");
                break;
            }
            _ = interval.tick() => {
                match poll_once(&pool, &api, min_playback_secs).await {
                    Ok(report) if report.recorded > 0 || report.discarded > 0 => {
                        tracing::info!(
                            active = report.active,
                            recorded = report.recorded,
                            discarded = report.discarded,
                            "Playback watchdog: sessions ended"
                        );
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "Playback watchdog: poll failed");
                    }
                }
            }
        }
    }
}

/// Poll `/sessions` once and update the watchdog table.
///
/// Does nothing while Jellyfin is not configured. A failed session fetch is
/// returned as an error without closing any pair, so an unreachable server
/// does not end every session at once.
pub async fn poll_once(
    pool: &PgPool,
    api: &JellyfinApi,
    min_playback_secs: i64,
) -> Result<PollReport, SyncError> {
    if !api.is_ready() {
        return Ok(PollReport::default());
    }

    let sessions = api.try_get_sessions().await?;
    let seen_at = Utc::now();

    let mut report = PollReport::default();
    for playing in sessions.iter().filter_map(to_playback_session) {
        WatchdogRepo::record_seen(pool, &playing, seen_at).await?;
        report.active += 1;
    }

    let finished = WatchdogRepo::finish_unseen(pool, seen_at, min_playback_secs).await?;
    report.recorded = finished.recorded.len();
    report.discarded = finished.discarded;
    Ok(report)
}

/// Describe what a session is playing; `None` when it is idle, playing a
/// trailer, or anonymous.
///
/// Episodes are stored against their series, with the season and episode
/// ids kept alongside.
pub fn to_playback_session(session: &Session) -> Option<PlaybackSession> {
    if !session.is_playing_media() || session.id.is_empty() {
        return None;
    }
    let item = session.now_playing_item.as_ref()?;
    let user_id = session.user_id.clone().filter(|id| !id.is_empty())?;

    let (item_id, season_id, episode_id) =
        match (item.item_type.as_deref(), item.series_id.as_ref()) {
            (Some(EPISODE_ITEM_TYPE), Some(series_id)) => (
                series_id.clone(),
                item.season_id.clone(),
                Some(item.id.clone()),
            ),
            _ => (item.id.clone(), None, None),
        };

    Some(PlaybackSession {
        session_id: Some(session.id.clone()),
        user_id,
        user_name: session.user_name.clone(),
        client: session.client.clone(),
        device_name: session.device_name.clone(),
        device_id: session.device_id.clone(),
        application_version: session.application_version.clone(),
        remote_end_point: session.remote_end_point.clone(),
        now_playing_item_id: item_id,
        now_playing_item_name: Some(item.name.clone()),
        season_id,
        episode_id,
        play_method: session.play_state.play_method.clone(),
        is_paused: session.play_state.is_paused,
    })
}
