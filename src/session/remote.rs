//! HTTP sign service client
//!
//! Delegates signing to an external service that runs the platform's
//! signature script:
//!
//! - `POST {endpoint}/sign` with `{"uri", "data", "cookie"}` answers
//!   `{"x-s": "...", "x-t": "..." | 1700000000000}`
//! - `POST {endpoint}/common` with `{"a1", "b1", "x_s", "x_t"}` answers
//!   `{"x-s-common": "..."}`

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::time::Duration;

use crate::{
    Error, Result,
    session::signer::{CommonDeriver, Signature, Signer},
    types::serde_helpers::deserialize_flexible_string,
};

#[derive(Debug, Serialize)]
struct SignRequest<'a> {
    uri: &'a str,
    data: Option<&'a Value>,
    cookie: &'a str,
}

#[derive(Debug, Deserialize)]
struct SignReply {
    #[serde(rename = "x-s")]
    x_s: String,
    #[serde(rename = "x-t", deserialize_with = "deserialize_flexible_string")]
    x_t: String,
}

#[derive(Debug, Serialize)]
struct CommonRequest<'a> {
    a1: &'a str,
    b1: &'a str,
    x_s: &'a str,
    x_t: &'a str,
}

#[derive(Debug, Deserialize)]
struct CommonReply {
    #[serde(rename = "x-s-common")]
    x_s_common: String,
}

/// Signer and common-header deriver backed by an HTTP sign service
#[derive(Debug, Clone)]
pub struct RemoteSigner {
    /// HTTP client for the sign service
    client: Client,
    /// Base URL of the sign service, without trailing slash
    endpoint: String,
}

impl RemoteSigner {
    /// Create a remote signer for the given base URL
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, endpoint))
    }

    /// Create a remote signer reusing an existing HTTP client
    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    /// Base URL of the sign service
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.endpoint, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::signer(format!("sign service unreachable at {}: {}", url, e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::signer(format!("failed to read sign service reply: {}", e)))?;

        if !status.is_success() {
            return Err(Error::signer(format!(
                "sign service returned HTTP {} for {}",
                status.as_u16(),
                path
            )));
        }

        serde_json::from_str(&text)
            .map_err(|e| Error::signer(format!("malformed sign service reply: {}", e)))
    }
}

#[async_trait]
impl Signer for RemoteSigner {
    async fn sign(&self, uri: &str, body: Option<&Value>, cookie: &str) -> Result<Signature> {
        tracing::debug!("Requesting signature for {}", uri);
        let reply: SignReply = self
            .call(
                "/sign",
                &SignRequest {
                    uri,
                    data: body,
                    cookie,
                },
            )
            .await?;
        Ok(Signature::new(reply.x_s, reply.x_t))
    }
}

#[async_trait]
impl CommonDeriver for RemoteSigner {
    async fn derive(&self, a1: &str, b1: &str, token: &str, timestamp: &str) -> Result<String> {
        let reply: CommonReply = self
            .call(
                "/common",
                &CommonRequest {
                    a1,
                    b1,
                    x_s: token,
                    x_t: timestamp,
                },
            )
            .await?;
        Ok(reply.x_s_common)
    }
}
