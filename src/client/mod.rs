//! Client facade
//!
//! [`KokkaiClient`] binds a configured HTTP transport and cache store to the
//! three search endpoints. Each call constructs a validated [`Query`] and a
//! fresh pagination engine; nothing is shared between searches except the
//! transport connection pool and the cache directory.

use crate::cache::CacheStore;
use crate::error::Result;
use crate::fetch::PageFetcher;
use crate::pagination::{PaginationEngine, SearchOptions, SearchResult};
use crate::query::{Query, SearchParams};
use std::path::PathBuf;
use std::time::Duration;

/// Production API base URL
pub const BASE_URL: &str = "https://kokkai.ndl.go.jp/api";

/// Configuration for [`KokkaiClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL
    pub base_url: String,
    /// User agent sent with every request
    pub user_agent: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Delay between consecutive page fetches of one search
    pub page_interval: Duration,
    /// Cache directory; `None` disables caching
    pub cache_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            user_agent: format!("kokkai-search/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(20),
            page_interval: Duration::ZERO,
            cache_dir: None,
        }
    }
}

impl ClientConfig {
    /// Create a config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the API base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set the per-request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the delay between page fetches
    #[must_use]
    pub fn page_interval(mut self, interval: Duration) -> Self {
        self.config.page_interval = interval;
        self
    }

    /// Enable on-disk caching under the given directory
    #[must_use]
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.cache_dir = Some(dir.into());
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Client for the Diet proceedings search API
#[derive(Debug, Clone)]
pub struct KokkaiClient {
    fetcher: PageFetcher,
    page_interval: Duration,
}

impl KokkaiClient {
    /// Create a client with default configuration (no cache)
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client from a configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let cache = match &config.cache_dir {
            Some(dir) => CacheStore::at(dir)?,
            None => CacheStore::disabled(),
        };

        Ok(Self {
            fetcher: PageFetcher::new(client, config.base_url, cache),
            page_interval: config.page_interval,
        })
    }

    /// Run a validated query against its endpoint
    ///
    /// One engine per search; the query variant determines the endpoint.
    pub async fn search(&self, query: &Query, options: &SearchOptions) -> Result<SearchResult> {
        PaginationEngine::new(&self.fetcher, query, options, self.page_interval)
            .run()
            .await
    }

    /// Search meeting summaries (`/meeting_list`)
    pub async fn meeting_list(
        &self,
        params: SearchParams,
        options: &SearchOptions,
    ) -> Result<SearchResult> {
        self.search(&Query::meeting_list(params)?, options).await
    }

    /// Search full meetings (`/meeting`)
    pub async fn meeting(
        &self,
        params: SearchParams,
        options: &SearchOptions,
    ) -> Result<SearchResult> {
        self.search(&Query::meeting(params)?, options).await
    }

    /// Search individual speeches (`/speech`)
    pub async fn speech(
        &self,
        params: SearchParams,
        options: &SearchOptions,
    ) -> Result<SearchResult> {
        self.search(&Query::speech(params)?, options).await
    }
}
