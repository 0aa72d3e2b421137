//! Error types for kokkai-search
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for kokkai-search
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Query Errors
    // ============================================================================
    /// Query construction or validation failed. Purely local, never
    /// reported by a network path.
    #[error("Invalid query: {message}")]
    Validation { message: String },

    // ============================================================================
    // Transport / Service Errors
    // ============================================================================
    /// Connection-level failure reported by the HTTP transport.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP response from the service.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The service signalled rate limiting (HTTP 429).
    #[error("Rate limited (HTTP 429): {body}")]
    RateLimited { body: String },

    /// A 2xx response whose body could not be decoded or lacks the
    /// expected structural fields.
    #[error("Malformed response: {message}")]
    Malformed { message: String },

    // ============================================================================
    // Pagination Errors
    // ============================================================================
    /// The cursor chain violated the termination contract. Fatal and
    /// non-retryable, unlike `Status`.
    #[error("Pagination invariant violated: {message}")]
    PaginationInvariant { message: String },

    // ============================================================================
    // Cache / I/O Errors
    // ============================================================================
    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Create a malformed-response error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Create a cache error
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create a pagination invariant error
    pub fn pagination_invariant(message: impl Into<String>) -> Self {
        Self::PaginationInvariant {
            message: message.into(),
        }
    }

    /// True when the failure originated on the remote side (a non-success
    /// response or a connection-level fault), as opposed to local misuse.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::Status { .. } | Error::RateLimited { .. }
        )
    }

    /// The HTTP status code carried by this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::RateLimited { .. } => Some(429),
            _ => None,
        }
    }
}

/// Result type alias for kokkai-search
pub type Result<T> = std::result::Result<T, Error>;
