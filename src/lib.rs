//! # kokkai-search
//!
//! Client and CLI for the National Diet proceedings full-text search API
//! (`https://kokkai.ndl.go.jp/api`).
//!
//! ## Features
//!
//! - **Three endpoints**: meeting summaries, full meetings, and individual
//!   speeches, behind one typed query model
//! - **Validated queries**: page-size ceilings, date ranges, and the
//!   at-least-one-condition rule are checked before any request is sent
//! - **Transparent pagination**: cursor chains are walked to exhaustion or
//!   to a caller-supplied cap, with a termination safety bound
//! - **Page caching**: optional on-disk cache keyed by a canonical request
//!   signature, so repeated searches skip the network
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use kokkai_search::{KokkaiClient, SearchOptions, SearchParams};
//!
//! #[tokio::main]
//! async fn main() -> kokkai_search::Result<()> {
//!     let client = KokkaiClient::new()?;
//!
//!     let params = SearchParams::builder()
//!         .any("気候変動")
//!         .since(2020)
//!         .maximum_records(100)
//!         .build();
//!
//!     let result = client
//!         .speech(params, &SearchOptions::new().with_limit_total(500))
//!         .await?;
//!
//!     println!("{} of {} speeches", result.records.len(), result.total_available);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                     KokkaiClient                       │
//! │  meeting_list()      meeting()      speech()           │
//! └───────────────────────────┬────────────────────────────┘
//!                             │ one engine per search
//! ┌───────────┬───────────────┴──────────┬─────────────────┐
//! │  Query    │   PaginationEngine       │   PageFetcher   │
//! ├───────────┼──────────────────────────┼─────────────────┤
//! │ validate  │ cursor walk              │ cache lookup    │
//! │ canonical │ limit_total / dry-run    │ one HTTP GET    │
//! │ params    │ safety ceiling           │ structural parse│
//! └───────────┴──────────────────────────┴─────────────────┘
//! ```

#![warn(clippy::all)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Typed, validated query model
pub mod query;

/// On-disk page cache
pub mod cache;

/// Single-page HTTP fetching
pub mod fetch;

/// Multi-page aggregation engine
pub mod pagination;

/// Client facade over the three endpoints
pub mod client;

/// Result serialization (JSON / JSONL / CSV)
pub mod output;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::{ClientConfig, KokkaiClient, BASE_URL};
pub use error::{Error, Result};
pub use fetch::Page;
pub use pagination::{SearchOptions, SearchResult};
pub use query::{Endpoint, Query, SearchParams};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
