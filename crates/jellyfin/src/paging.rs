//! Pagination parameters for the `/Items` endpoint.

use std::time::Duration;

/// Page size used when the caller does not choose one.
pub const DEFAULT_PAGE_SIZE: u64 = 200;

/// Assumed total before the first page reports the real one.
pub const INITIAL_TOTAL: u64 = 200;

/// Pause between consecutive page requests.
pub const PAGE_DELAY: Duration = Duration::from_millis(10);

/// Query fields requested for every paged item.
pub const ITEM_FIELDS: &str = "MediaSources,DateCreated";

/// Where to start, how many items per request, and whether to descend into
/// child folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub start_index: u64,
    pub increment: u64,
    pub recursive: bool,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            start_index: 0,
            increment: DEFAULT_PAGE_SIZE,
            recursive: true,
        }
    }
}

impl PageParams {
    /// Page size, never zero.
    pub fn page_size(&self) -> u64 {
        self.increment.max(1)
    }
}

/// Progress after a page has been fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageProgress {
    /// Index of the next item to request.
    pub fetched: u64,
    /// Total reported by the server.
    pub total: u64,
}

impl PageProgress {
    /// Completion percentage; may exceed 100 on the last page.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.fetched as f64 / self.total as f64 * 100.0
    }

    /// `"{label} - 42.50%"`, as shown in sync status messages.
    pub fn describe(&self, label: &str) -> String {
        format!("{label} - {:.2}%", self.percent())
    }
}
