//! Pagination engine
//!
//! Drives repeated page fetches for one query: advances the cursor,
//! aggregates records, enforces the caller's total cap, and bounds the
//! number of iterations so a misbehaving cursor chain cannot loop forever.
//!
//! One engine instance serves exactly one search; the client facade builds
//! a fresh one per call.

mod types;

pub use types::{SearchOptions, SearchResult};

use crate::error::{Error, Result};
use crate::fetch::PageFetcher;
use crate::query::Query;
use std::time::Duration;
use tracing::debug;

/// Cursor position of the first record
pub const START_RECORD: u64 = 1;

/// Extra pages tolerated beyond `ceil(total / page_size)` before the run is
/// declared non-terminating
const SAFETY_MARGIN: u64 = 8;

/// Single-use engine for one search
pub(crate) struct PaginationEngine<'a> {
    fetcher: &'a PageFetcher,
    query: &'a Query,
    options: &'a SearchOptions,
    page_interval: Duration,
}

impl<'a> PaginationEngine<'a> {
    pub(crate) fn new(
        fetcher: &'a PageFetcher,
        query: &'a Query,
        options: &'a SearchOptions,
        page_interval: Duration,
    ) -> Self {
        Self {
            fetcher,
            query,
            options,
            page_interval,
        }
    }

    /// Drive the search to a terminal state
    pub(crate) async fn run(self) -> Result<SearchResult> {
        if let Some(limit) = self.options.limit_total {
            if limit == 0 {
                return Err(Error::validation("limit_total must be positive"));
            }
        }

        let endpoint = self.query.endpoint();
        let mut params = self.query.to_request_params();

        if self.options.dry_run {
            // One minimal request, metadata only
            params.insert("maximumRecords".to_string(), "1".to_string());
            let page = self.fetcher.fetch(endpoint, &params, START_RECORD).await?;
            return Ok(SearchResult {
                total_available: page.total_available,
                records: Vec::new(),
                truncated: false,
                pages_fetched: 1,
            });
        }

        let page_size = u64::from(self.query.effective_page_size());
        let mut cursor = START_RECORD;
        let mut records = Vec::new();

        let mut page = self.fetcher.fetch(endpoint, &params, cursor).await?;
        let mut pages_fetched: u32 = 1;

        // The first page tells us how many fetches a terminating run can
        // possibly need.
        let total_available = page.total_available;
        let ceiling = total_available.div_ceil(page_size).max(1) + SAFETY_MARGIN;

        loop {
            debug!(
                "page {pages_fetched}: {} records, next cursor {:?}",
                page.records.len(),
                page.next_cursor
            );
            records.append(&mut page.records);

            if let Some(limit) = self.options.limit_total {
                if records.len() >= limit {
                    records.truncate(limit);
                    return Ok(SearchResult {
                        total_available,
                        records,
                        truncated: true,
                        pages_fetched,
                    });
                }
            }

            let Some(next) = page.next_cursor else {
                break;
            };

            if next <= cursor {
                return Err(Error::pagination_invariant(format!(
                    "cursor did not advance: {next} after {cursor}"
                )));
            }
            if u64::from(pages_fetched) >= ceiling {
                return Err(Error::pagination_invariant(format!(
                    "exceeded the ceiling of {ceiling} pages for {total_available} records"
                )));
            }
            cursor = next;

            if !self.page_interval.is_zero() {
                tokio::time::sleep(self.page_interval).await;
            }

            page = self.fetcher.fetch(endpoint, &params, cursor).await?;
            pages_fetched += 1;
        }

        Ok(SearchResult {
            total_available,
            records,
            truncated: false,
            pages_fetched,
        })
    }
}

#[cfg(test)]
mod tests;
