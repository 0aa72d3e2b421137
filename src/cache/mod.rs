//! On-disk page cache
//!
//! Content-addressed store mapping a canonical request signature to a
//! previously fetched page body. The signature is the canonical JSON of
//! `{endpoint, params}`; file identity is the SHA-256 of that string, so
//! arbitrarily long query text never produces an invalid file name.
//!
//! A disabled store (no directory configured) always misses on `get` and
//! ignores `put`, which keeps the fetch path oblivious to whether caching
//! is active. Entries persist indefinitely; staleness is the caller's
//! concern.

use crate::error::{Error, Result};
use crate::query::Endpoint;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Canonical signature for one page request
///
/// Deterministic over logically identical requests: the parameter map is
/// ordered, and serialization is compact with no optional whitespace.
pub fn request_signature(endpoint: Endpoint, params: &BTreeMap<String, String>) -> String {
    let payload = serde_json::json!({
        "endpoint": endpoint.path(),
        "params": params,
    });
    payload.to_string()
}

/// On-disk page cache keyed by request signature
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: Option<PathBuf>,
}

impl CacheStore {
    /// Create a store rooted at `dir`, creating the directory if needed
    pub fn at(dir: impl AsRef<Path>) -> Result<Self> {
        let root = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).map_err(|e| {
            Error::cache(format!(
                "failed to create cache directory {}: {e}",
                root.display()
            ))
        })?;
        Ok(Self { root: Some(root) })
    }

    /// Create a disabled store: `get` always misses, `put` is a no-op
    pub fn disabled() -> Self {
        Self { root: None }
    }

    /// Whether this store persists anything
    pub fn is_enabled(&self) -> bool {
        self.root.is_some()
    }

    /// Look up a cached page body. Any read or parse failure is a miss.
    pub async fn get(&self, signature: &str) -> Option<Value> {
        let path = self.entry_path(signature)?;
        let contents = tokio::fs::read_to_string(&path).await.ok()?;
        match serde_json::from_str(&contents) {
            Ok(value) => {
                debug!("cache hit: {}", path.display());
                Some(value)
            }
            Err(e) => {
                debug!("cache entry {} unreadable, treating as miss: {e}", path.display());
                None
            }
        }
    }

    /// Store a page body under its signature, best-effort
    ///
    /// A cache write failure must never fail the request that produced the
    /// page, so errors are only logged.
    pub async fn put(&self, signature: &str, body: &Value) {
        let Some(path) = self.entry_path(signature) else {
            return;
        };
        if let Err(e) = self.write_atomic(&path, body).await {
            warn!("failed to write cache entry {}: {e}", path.display());
        }
    }

    /// Write via temp file + rename so concurrent writers of the same
    /// signature leave a whole entry behind (last writer wins).
    async fn write_atomic(&self, path: &Path, body: &Value) -> Result<()> {
        let contents = serde_json::to_string(body)
            .map_err(|e| Error::cache(format!("failed to serialize page: {e}")))?;
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, path).await?;
        Ok(())
    }

    fn entry_path(&self, signature: &str) -> Option<PathBuf> {
        let root = self.root.as_ref()?;
        let digest = Sha256::digest(signature.as_bytes());
        Some(root.join(format!("{digest:x}.json")))
    }
}
