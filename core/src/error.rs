//! Error types for the tag feed client.
//!
//! # Design
//! Transport failures are split by whether a retry could help: connection
//! failures and timeouts are transient, everything else is fatal. Upstream
//! HTTP error statuses are not errors at this layer; they arrive as a normal
//! `ApiResponse` and the caller decides what the body means.

use thiserror::Error;

/// Failure reported by a `Transport` for a single dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The connection could not be established or was dropped mid-request.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The attempt did not finish within its timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Any other failure (bad URI, TLS, protocol, redirect loop, ...).
    #[error("transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Whether another attempt at the same URL might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, TransportError::Connect(_) | TransportError::Timeout(_))
    }
}

/// Errors returned by `TagFeedClient` fetch operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The tag is empty or contains characters that would alter the URL path.
    #[error("invalid tag: {0:?}")]
    InvalidTag(String),

    /// The app key would not stay a single URL path segment.
    #[error("invalid app key: {0:?}")]
    InvalidAppKey(String),

    /// Page numbers start at 1.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),

    /// The assembled endpoint URL does not parse as an absolute URL.
    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Every attempt failed with a transient transport error.
    #[error("requesting {url} failed {attempts} times, last error: {last_error}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last_error: TransportError,
    },

    /// A non-transient transport failure; not retried.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body could not be decoded as JSON.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),
}
