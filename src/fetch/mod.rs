//! Page fetcher
//!
//! Issues one HTTP request per (endpoint, params, cursor) triple, consulting
//! the cache store first and writing parsed pages back on success. Failed
//! fetches are never cached, so a retried search re-fetches only the page
//! that failed.

use crate::cache::{request_signature, CacheStore};
use crate::error::{Error, Result};
use crate::query::Endpoint;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Query parameter carrying the cursor
pub const START_RECORD_PARAM: &str = "startRecord";

/// Longest error-body excerpt carried in a `Status` error
const ERROR_BODY_LIMIT: usize = 500;

/// One fetched unit of results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Total records the service reports for the whole query
    pub total_available: u64,
    /// Position of the next page's first record, absent at end-of-results
    pub next_cursor: Option<u64>,
    /// Records in service order
    pub records: Vec<Map<String, Value>>,
}

/// Fetches single pages, cache-first
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
    base_url: String,
    cache: CacheStore,
}

impl PageFetcher {
    /// Create a fetcher over an HTTP client and a cache store
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, cache: CacheStore) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache,
        }
    }

    /// Fetch one page for `params` at the given cursor position
    ///
    /// `params` is the canonical parameter map of a validated query; the
    /// cursor is added here so the cache signature covers it.
    pub async fn fetch(
        &self,
        endpoint: Endpoint,
        params: &BTreeMap<String, String>,
        start_record: u64,
    ) -> Result<Page> {
        let mut params = params.clone();
        params.insert(START_RECORD_PARAM.to_string(), start_record.to_string());

        let signature = request_signature(endpoint, &params);
        if let Some(body) = self.cache.get(&signature).await {
            match parse_page(endpoint, &body) {
                Ok(page) => return Ok(page),
                // An entry that no longer parses is as good as absent
                Err(e) => debug!("discarding unusable cache entry: {e}"),
            }
        }

        let url = format!("{}/{}", self.base_url, endpoint.path());
        debug!("GET {url} startRecord={start_record}");
        let response = self.client.get(&url).query(&params).send().await?;

        let status = response.status();
        if status.as_u16() == 429 {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::RateLimited {
                body: truncate(&body),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::status(status.as_u16(), truncate(&body)));
        }

        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text)
            .map_err(|e| Error::malformed(format!("response is not valid JSON: {e}")))?;

        let page = parse_page(endpoint, &body)?;
        self.cache.put(&signature, &body).await;
        Ok(page)
    }
}

/// Extract the structural page fields from a response body
///
/// `numberOfRecords` is required; the record array may be omitted entirely
/// when a page is empty (the service does this), but a present key must hold
/// an array. Count and cursor fields arrive as numbers or numeric strings
/// depending on the endpoint.
pub fn parse_page(endpoint: Endpoint, body: &Value) -> Result<Page> {
    let object = body
        .as_object()
        .ok_or_else(|| Error::malformed("response body is not a JSON object"))?;

    let total_available = object
        .get("numberOfRecords")
        .and_then(as_u64)
        .ok_or_else(|| Error::malformed("missing or non-numeric numberOfRecords"))?;

    let next_cursor = match object.get("nextRecordPosition") {
        None | Some(Value::Null) => None,
        Some(v) => Some(
            as_u64(v).ok_or_else(|| Error::malformed("non-numeric nextRecordPosition"))?,
        ),
    };

    let records = match object.get(endpoint.record_key()) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Object(map) => map.clone(),
                other => {
                    // Keep non-object entries rather than dropping them
                    let mut wrapped = Map::new();
                    wrapped.insert("value".to_string(), other.clone());
                    wrapped
                }
            })
            .collect(),
        Some(other) => {
            return Err(Error::malformed(format!(
                "unexpected {} shape: expected array, got {}",
                endpoint.record_key(),
                type_name(other)
            )))
        }
    };

    Ok(Page {
        total_available,
        next_cursor,
        records,
    })
}

fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn truncate(body: &str) -> String {
    body.trim().chars().take(ERROR_BODY_LIMIT).collect()
}
