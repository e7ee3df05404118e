//! Signing collaborators
//!
//! The signature algorithm itself lives outside this crate. These traits are
//! the seams the header composer calls through.

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;

/// Raw signature produced for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Signature token (`x-s`)
    pub token: String,
    /// Signing timestamp (`x-t`)
    pub timestamp: String,
}

impl Signature {
    /// Create a new signature
    pub fn new(token: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// Produces a signature for a request URL, optional JSON body and cookie
#[async_trait]
pub trait Signer: Send + Sync + std::fmt::Debug {
    /// Sign one request.
    ///
    /// `uri` is the path including any serialized query string. `body` is the
    /// structured body before wire escaping.
    async fn sign(&self, uri: &str, body: Option<&Value>, cookie: &str) -> Result<Signature>;
}

/// Derives the `x-s-common` header from session identifiers and a signature
#[async_trait]
pub trait CommonDeriver: Send + Sync + std::fmt::Debug {
    /// Derive the common header value
    async fn derive(&self, a1: &str, b1: &str, token: &str, timestamp: &str) -> Result<String>;
}

/// Stand-in for clients that never sign, such as page-only fetches.
///
/// Every signing attempt fails with a configuration error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsigned;

#[async_trait]
impl Signer for Unsigned {
    async fn sign(&self, _uri: &str, _body: Option<&Value>, _cookie: &str) -> Result<Signature> {
        Err(crate::Error::config("no sign server configured"))
    }
}

#[async_trait]
impl CommonDeriver for Unsigned {
    async fn derive(&self, _a1: &str, _b1: &str, _token: &str, _timestamp: &str) -> Result<String> {
        Err(crate::Error::config("no sign server configured"))
    }
}
