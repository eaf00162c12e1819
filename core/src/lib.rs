//! Blocking client core for the tag entries feed.
//!
//! # Overview
//! Fetches pages of entries for a tag, signing every request with an
//! `apisign` header and retrying connection failures and timeouts a bounded
//! number of times. Response bodies are returned as raw JSON.
//!
//! # Design
//! - `TagFeedClient` takes its `Credentials` and `ClientConfig` at
//!   construction; nothing is read from globals or the environment.
//! - I/O sits behind the `Transport` trait. `UreqTransport` is the default;
//!   tests substitute scripted transports.
//! - Retry count and backoff live in `RetryPolicy`.
//! - HTTP error statuses are not errors here; callers read
//!   `ApiResponse::status` and the body themselves.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod retry;
pub mod signer;
pub mod transport;
pub mod types;

pub use client::{TagFeedClient, SIGNATURE_HEADER};
pub use config::{ClientConfig, Credentials, DEFAULT_TIMEOUT};
pub use endpoint::DEFAULT_BASE_URL;
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use retry::{Backoff, RetryPolicy, DEFAULT_MAX_ATTEMPTS};
pub use signer::sign;
pub use transport::UreqTransport;
pub use types::ApiResponse;
