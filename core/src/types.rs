//! Response wrapper handed back by fetch operations.
//!
//! # Design
//! The body is kept as an untyped `serde_json::Value`; entry and pagination
//! schemas belong to the caller. The HTTP status rides along because error
//! statuses are passed through as ordinary responses.

use serde::Serialize;
use serde_json::Value;

/// Decoded JSON body of a completed API call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    status: u16,
    body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// HTTP status of the exchange. Not checked by the client.
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_body(self) -> Value {
        self.body
    }
}
