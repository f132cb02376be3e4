//! Shared progress of the sync tasks.
//!
//! Only one sync (scheduled or on demand) runs at a time. A task claims the
//! tracker with [`SyncTracker::try_begin`] and reports progress through the
//! returned [`SyncGuard`]; dropping the guard releases the tracker.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use jellystat_core::types::Timestamp;
use serde::Serialize;

/// Outcome of the last completed task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    pub task: String,
    pub success: bool,
    pub message: String,
}

/// Snapshot returned by `GET /sync/status`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncStatus {
    pub running: bool,
    /// Task currently (or last) running.
    pub task: Option<String>,
    /// Latest progress message, e.g. `"Movies - 42.50%"`.
    pub message: Option<String>,
    pub started_at: Option<Timestamp>,
    pub finished_at: Option<Timestamp>,
    pub last_result: Option<SyncResult>,
}

#[derive(Debug, Default)]
pub struct SyncTracker {
    status: Mutex<SyncStatus>,
}

impl SyncTracker {
    /// Claim the tracker for `task`; `None` if another task is running.
    pub fn try_begin(self: &Arc<Self>, task: &str) -> Option<SyncGuard> {
        let mut status = self.lock();
        if status.running {
            return None;
        }
        status.running = true;
        status.task = Some(task.to_string());
        status.message = None;
        status.started_at = Some(Utc::now());
        status.finished_at = None;
        drop(status);

        tracing::info!(task, "Sync started");
        Some(SyncGuard {
            tracker: Arc::clone(self),
            task: task.to_string(),
            finished: false,
        })
    }

    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    pub fn snapshot(&self) -> SyncStatus {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, SyncStatus> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Exclusive handle on the tracker for one running task.
#[derive(Debug)]
pub struct SyncGuard {
    tracker: Arc<SyncTracker>,
    task: String,
    finished: bool,
}

impl SyncGuard {
    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn progress(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(task = %self.task, %message, "Sync progress");
        self.tracker.lock().message = Some(message);
    }

    /// Record the outcome and release the tracker.
    pub fn finish(mut self, success: bool, message: impl Into<String>) {
        let result = SyncResult {
            task: self.task.clone(),
            success,
            message: message.into(),
        };
        self.tracker.lock().last_result = Some(result);
        self.finished = true;
    }
}

impl Drop for SyncGuard {
    fn drop(&mut self) {
        let mut status = self.tracker.lock();
        status.running = false;
        status.finished_at = Some(Utc::now());
        if !self.finished {
            status.last_result = Some(SyncResult {
                task: self.task.clone(),
                success: false,
                message: "Interrupted".to_string(),
            });
        }
    }
}
