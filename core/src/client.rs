//! Signed, retrying client for the tag entries feed.
//!
//! # Design
//! `TagFeedClient` owns its credentials, settings and a `Transport`. Every
//! attempt goes through `build_request`, which signs the exact URL about to be
//! dispatched, so a retry always carries a signature computed from the URL it
//! is sent to. A completed exchange is final whatever its status code; only
//! connection failures and timeouts lead to another attempt.

use std::thread;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::{ClientConfig, Credentials};
use crate::endpoint;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::retry::RetryPolicy;
use crate::signer;
use crate::transport::UreqTransport;
use crate::types::ApiResponse;

/// Name of the header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "apisign";

/// Blocking client for paginated tag feeds.
#[derive(Debug, Clone)]
pub struct TagFeedClient<T = UreqTransport> {
    credentials: Credentials,
    base_url: String,
    timeout: Duration,
    retry: RetryPolicy,
    transport: T,
}

impl TagFeedClient<UreqTransport> {
    pub fn new(credentials: Credentials, config: ClientConfig) -> Self {
        Self::with_transport(credentials, config, UreqTransport::new())
    }
}

impl<T: Transport> TagFeedClient<T> {
    pub fn with_transport(credentials: Credentials, config: ClientConfig, transport: T) -> Self {
        Self {
            credentials,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
            retry: config.retry,
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Canonical URL of page `page` of tag `tag` for the configured app key.
    pub fn tag_page_url(&self, tag: &str, page: u32) -> Result<String, ApiError> {
        endpoint::tag_entries_url(&self.base_url, tag, page, self.credentials.app_key())
    }

    /// The signed GET a single attempt at `url` dispatches.
    pub fn build_request(&self, url: &str) -> HttpRequest {
        let signature = signer::sign(url, self.credentials.app_secret());
        HttpRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: vec![(SIGNATURE_HEADER.to_string(), signature)],
            timeout: self.timeout,
        }
    }

    /// Fetch page `page` (1-based) of the entries tagged `tag`.
    pub fn fetch_tag_page(&self, tag: &str, page: u32) -> Result<ApiResponse, ApiError> {
        let url = self.tag_page_url(tag, page)?;
        self.get_with_retry(&url)
    }

    /// Fetch a pagination link taken from an earlier response. The URL is
    /// dispatched and signed exactly as given.
    pub fn fetch_next_page(&self, url: &str) -> Result<ApiResponse, ApiError> {
        self.get_with_retry(url)
    }

    fn get_with_retry(&self, url: &str) -> Result<ApiResponse, ApiError> {
        let max_attempts = self.retry.max_attempts();
        let mut attempt = 1;
        loop {
            let request = self.build_request(url);
            debug!(method = request.method.as_str(), url = %url, attempt, "dispatching request");

            let err = match self.transport.send(&request) {
                Ok(response) => return parse_body(response),
                Err(err) => err,
            };
            if !self.retry.is_retryable(&err) {
                return Err(ApiError::Transport(err));
            }

            warn!(url = %url, attempt, error = %err, "request failed, fail count: {attempt}");
            if attempt >= max_attempts {
                error!(url = %url, attempts = attempt, "giving up after too many failed requests");
                return Err(ApiError::RetriesExhausted {
                    url: url.to_string(),
                    attempts: attempt,
                    last_error: err,
                });
            }

            let delay = self.retry.delay_after(attempt);
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            attempt += 1;
        }
    }
}

/// Decode the body of a completed exchange. The status code is recorded but
/// never checked.
fn parse_body(response: HttpResponse) -> Result<ApiResponse, ApiError> {
    let body: Value = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    Ok(ApiResponse::new(response.status, body))
}
