//! Request type definitions
//!
//! Defines the per-call options accepted by the request pipeline and the
//! routing targets a request can be sent to.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::settings::HostSettings;

/// Base host a request is routed to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    /// Main web API host
    #[default]
    Default,
    /// Creator portal API host
    Creator,
    /// Customer portal API host
    Customer,
}

impl Endpoint {
    /// Resolve the base URL for this target, without a trailing `/`
    pub fn base_url(self, hosts: &HostSettings) -> &str {
        let host = match self {
            Endpoint::Default => &hosts.api,
            Endpoint::Creator => &hosts.creator,
            Endpoint::Customer => &hosts.customer,
        };
        host.trim_end_matches('/')
    }
}

/// Options for a single pipeline call
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Query parameters, serialized before signing (GET only)
    pub params: Vec<(String, String)>,

    /// JSON body (POST only)
    pub body: Option<Value>,

    /// Routing target
    pub target: Endpoint,

    /// Extra headers for this call only
    pub headers: HeaderMap,
}

impl RequestOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Add several query parameters
    pub fn with_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set the JSON body
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set the routing target
    pub fn with_target(mut self, target: Endpoint) -> Self {
        self.target = target;
        self
    }

    /// Add an extra header
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}
