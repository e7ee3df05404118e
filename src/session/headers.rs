//! Signed header composition
//!
//! Builds the three platform-required headers for one request. The composer
//! holds no state of its own; every call signs the exact URL, body and cookie
//! it is given.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::sync::Arc;

use crate::{
    Error, Result,
    session::{
        signer::{CommonDeriver, Signer},
        state::cookie_field,
    },
};

/// Signature header name
pub const HEADER_SIGNATURE: &str = "x-s";
/// Timestamp header name
pub const HEADER_TIMESTAMP: &str = "x-t";
/// Common header name
pub const HEADER_COMMON: &str = "x-s-common";

/// Cookie field holding the device identifier
const A1_FIELD: &str = "a1";
/// Secondary identifier; the web client always sends it empty
const B1_PLACEHOLDER: &str = "";

/// Headers computed for exactly one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    /// `x-s`
    pub signature: String,
    /// `x-t`
    pub timestamp: String,
    /// `x-s-common`
    pub common: String,
}

impl SignedHeaders {
    /// Encode as a header map for a single outgoing request
    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::with_capacity(3);
        for (name, value) in [
            (HEADER_SIGNATURE, &self.signature),
            (HEADER_TIMESTAMP, &self.timestamp),
            (HEADER_COMMON, &self.common),
        ] {
            let value = HeaderValue::from_str(value).map_err(|_| Error::invalid_header(name))?;
            headers.insert(HeaderName::from_static(name), value);
        }
        Ok(headers)
    }
}

/// Composes signed headers from the signer collaborators
#[derive(Debug, Clone)]
pub struct HeaderComposer {
    signer: Arc<dyn Signer>,
    deriver: Arc<dyn CommonDeriver>,
}

impl HeaderComposer {
    /// Create a composer over the given collaborators
    pub fn new(signer: Arc<dyn Signer>, deriver: Arc<dyn CommonDeriver>) -> Self {
        Self { signer, deriver }
    }

    /// Compute the signed headers for one request.
    ///
    /// A missing `a1` field is signed as an empty identifier.
    pub async fn compose(
        &self,
        uri: &str,
        body: Option<&Value>,
        cookie: &str,
    ) -> Result<SignedHeaders> {
        let a1 = cookie_field(cookie, A1_FIELD).unwrap_or_default();
        if a1.is_empty() {
            tracing::debug!("Cookie has no {} field, signing without it", A1_FIELD);
        }

        let signature = self.signer.sign(uri, body, cookie).await?;
        let common = self
            .deriver
            .derive(a1, B1_PLACEHOLDER, &signature.token, &signature.timestamp)
            .await?;

        tracing::debug!("Signed {} at {}", uri, signature.timestamp);

        Ok(SignedHeaders {
            signature: signature.token,
            timestamp: signature.timestamp,
            common,
        })
    }
}
