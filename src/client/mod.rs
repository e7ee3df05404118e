//! # Client Module
//!
//! [`XhsClient`] is the single chokepoint every API call flows through:
//!
//! 1. the final URI is built (query string appended for GET)
//! 2. signed headers are composed for that exact URI, body and cookie
//! 3. the body is escaped for the wire
//! 4. the request is sent with per-call headers only
//! 5. the response is handed to [`classify`]
//!
//! Signed headers are never stored on the HTTP client, so concurrent calls on
//! one instance cannot see each other's signatures.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use xhs_client::{RemoteSigner, Settings, XhsClient};
//!
//! # async fn example() -> xhs_client::Result<()> {
//! let settings = Settings::default();
//! let signer = Arc::new(RemoteSigner::new(
//!     "http://127.0.0.1:5005",
//!     settings.signer_timeout(),
//! )?);
//! let client = XhsClient::new(settings, signer.clone(), signer)?;
//! client.set_cookie("a1=...; web_session=...").await;
//!
//! let me = client.get_self_info().await?;
//! println!("{}", me);
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod endpoints;
pub mod fallback;
pub mod payload;

pub use classify::{VERIFY_STATUS_CODES, classify};

use reqwest::{
    Client, Method,
    header::{CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue},
};
use serde_json::Value;
use std::sync::Arc;

use crate::{
    Error, Result,
    config::Settings,
    error::ResponseSnapshot,
    session::{CommonDeriver, HeaderComposer, RemoteSigner, SessionState, Signer},
    types::{Payload, RequestOptions},
};

/// Signed web API client
#[derive(Debug, Clone)]
pub struct XhsClient {
    /// Configuration settings
    settings: Arc<Settings>,
    /// HTTP client; carries no per-request state
    http: Client,
    /// Cookie state
    session: Arc<SessionState>,
    /// Signed header composer
    composer: HeaderComposer,
}

impl XhsClient {
    /// Creates a new client with the given configuration and signer collaborators.
    ///
    /// # Errors
    ///
    /// Fails when the settings do not validate or the HTTP client cannot be
    /// built (for example an unusable proxy URL).
    pub fn new(
        settings: Settings,
        signer: Arc<dyn Signer>,
        deriver: Arc<dyn CommonDeriver>,
    ) -> Result<Self> {
        settings.validate()?;

        let mut builder = Client::builder()
            .user_agent(settings.client.user_agent.as_str())
            .timeout(settings.timeout());

        // Environment proxies are picked up by reqwest itself
        if let Some(proxy) = &settings.client.proxy {
            tracing::info!("Using proxy {}", proxy);
            builder = builder.proxy(reqwest::Proxy::all(proxy.as_str())?);
        }

        let http = builder.build()?;
        let session = Arc::new(SessionState::new(settings.client.cookie.clone()));

        Ok(Self {
            settings: Arc::new(settings),
            http,
            session,
            composer: HeaderComposer::new(signer, deriver),
        })
    }

    /// Creates a client signing through the sign service named in the settings.
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let endpoint = settings.signer.endpoint.clone().ok_or_else(|| {
            Error::config("no sign server configured (set --sign-server or XHS_SIGN_SERVER)")
        })?;
        let signer = Arc::new(RemoteSigner::new(endpoint, settings.signer_timeout())?);
        Self::new(settings, signer.clone(), signer)
    }

    /// Configuration in use
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Last stored cookie, if any
    pub async fn cookie(&self) -> Option<String> {
        self.session.cookie().await
    }

    /// Replace the session cookie
    pub async fn set_cookie(&self, raw: impl Into<String>) {
        self.session.set_cookie(raw).await;
    }

    /// Named field of the session cookie
    pub async fn cookie_field(&self, name: &str) -> Option<String> {
        self.session.cookie_field(name).await
    }

    /// Issue a signed GET on the default host
    pub async fn get(&self, uri: &str, params: &[(&str, &str)]) -> Result<Value> {
        let options = RequestOptions::new().with_params(params.iter().copied());
        self.execute(Method::GET, uri, options)
            .await
            .map(Payload::into_value)
    }

    /// Issue a signed POST on the default host
    pub async fn post(&self, uri: &str, body: Option<Value>) -> Result<Value> {
        let mut options = RequestOptions::new();
        options.body = body;
        self.execute(Method::POST, uri, options)
            .await
            .map(Payload::into_value)
    }

    /// Run one request through the signing and classification pipeline.
    ///
    /// Query parameters are appended before signing, so the signed URI is the
    /// URI on the wire. The signer sees the structured body; the wire carries
    /// the escaped JSON string.
    pub async fn execute(
        &self,
        method: Method,
        uri: &str,
        options: RequestOptions,
    ) -> Result<Payload> {
        let response = self.send(method, uri, options).await?;
        classify(response.status, &response.headers, &response.body)
    }

    /// Sign and send one request, returning the response unclassified.
    pub(crate) async fn send(
        &self,
        method: Method,
        uri: &str,
        options: RequestOptions,
    ) -> Result<ResponseSnapshot> {
        let RequestOptions {
            params,
            body,
            target,
            headers: extra_headers,
        } = options;

        let final_uri = payload::with_query(uri, &params);

        // Cookie mutation waits until this request has been signed
        let (signed, cookie) = {
            let guard = self.session.lock_for_signing().await;
            let cookie = guard.as_deref().unwrap_or_default().to_string();
            let signed = self
                .composer
                .compose(&final_uri, body.as_ref(), &cookie)
                .await?;
            (signed, cookie)
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if !cookie.is_empty() {
            let value =
                HeaderValue::from_str(&cookie).map_err(|_| Error::invalid_header("cookie"))?;
            headers.insert(COOKIE, value);
        }
        headers.extend(extra_headers);
        headers.extend(signed.to_header_map()?);

        let url = format!("{}{}", target.base_url(&self.settings.hosts), final_uri);
        tracing::debug!("{} {}", method, url);

        let mut request = self.http.request(method, &url).headers(headers);
        if let Some(body) = &body {
            request = request.body(payload::encode_body(body)?);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let response_headers = response.headers().clone();
        let text = response.text().await?;

        tracing::debug!("HTTP {} from {} ({} bytes)", status, url, text.len());

        Ok(ResponseSnapshot::new(status, response_headers, text))
    }

    /// Send an unsigned GET and return status, headers and body text.
    ///
    /// Used by the HTML fallback, which reads pages rather than the API.
    pub(crate) async fn fetch_page(
        &self,
        url: &str,
        extra_headers: HeaderMap,
    ) -> Result<(u16, HeaderMap, String)> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = self.session.cookie().await.filter(|c| !c.is_empty()) {
            let value =
                HeaderValue::from_str(&cookie).map_err(|_| Error::invalid_header("cookie"))?;
            headers.insert(COOKIE, value);
        }
        headers.extend(extra_headers);

        tracing::debug!("GET {}", url);
        let response = self.http.get(url).headers(headers).send().await?;
        let status = response.status().as_u16();
        let response_headers = response.headers().clone();
        let text = response.text().await?;
        Ok((status, response_headers, text))
    }
}
