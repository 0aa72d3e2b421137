//! Pagination types
//!
//! Options and result types for a whole multi-page search.

use serde::Serialize;
use serde_json::{Map, Value};

/// Options for one search
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Cap on records aggregated across all pages (`None` = fetch until
    /// exhausted)
    pub limit_total: Option<usize>,
    /// Report only the total count, fetching a single minimal page
    pub dry_run: bool,
}

impl SearchOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total-record cap
    #[must_use]
    pub fn with_limit_total(mut self, limit: usize) -> Self {
        self.limit_total = Some(limit);
        self
    }

    /// Enable dry-run mode
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Aggregated result of a whole search
///
/// Records preserve service order across pages. `total_available` and
/// `truncated` are always meaningful, including when `records` is empty
/// (the dry-run case).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// Total records the service reports for the query
    pub total_available: u64,
    /// Aggregated records in service order
    pub records: Vec<Map<String, Value>>,
    /// True when the caller's cap cut the aggregation short
    pub truncated: bool,
    /// Number of page fetches performed (cache hits included)
    pub pages_fetched: u32,
}
