//! Request signatures for the `apisign` header.
//!
//! The API authenticates a request by the MD5 digest of the application
//! secret immediately followed by the exact URL being requested. The scheme is
//! fixed by the server; it is a compatibility requirement, not a choice.

use md5::{Digest, Md5};

/// Compute the `apisign` value for `url` using `secret`.
///
/// The digest covers the URL bytes exactly as dispatched, so any change to the
/// URL (page number, query order, a trailing slash) yields a different token.
pub fn sign(url: &str, secret: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(secret.as_bytes());
    hasher.update(url.as_bytes());
    format!("{:x}", hasher.finalize())
}
