//! Configuration settings structure
//!
//! Defines the main settings structure and loading logic for the client.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Desktop browser user agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/111.0.0.0 Safari/537.36";

/// Main configuration settings for the client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// HTTP client configuration
    pub client: ClientSettings,
    /// Base hosts for routing
    pub hosts: HostSettings,
    /// External sign service configuration
    pub signer: SignerSettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// HTTP client and session configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Raw cookie string
    pub cookie: Option<String>,
    /// User agent header
    pub user_agent: String,
    /// Overall request timeout in milliseconds
    pub timeout_ms: u64,
    /// Proxy URL (http://host:port, socks5://host:port, etc.)
    pub proxy: Option<String>,
}

/// Base hosts the routing targets resolve to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSettings {
    /// Main web API host
    pub api: String,
    /// Creator portal API host
    pub creator: String,
    /// Customer portal API host
    pub customer: String,
    /// Public web site, used by the HTML fallback
    pub home: String,
}

/// External sign service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerSettings {
    /// Base URL of the sign service
    pub endpoint: Option<String>,
    /// Sign service request timeout in milliseconds
    pub timeout_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level
    pub level: String,
    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            cookie: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_ms: 10_000,
            proxy: None,
        }
    }
}

// Cookie values stay out of debug output.
impl std::fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSettings")
            .field(
                "cookie",
                &self.cookie.as_ref().map(|c| format!("<{} bytes>", c.len())),
            )
            .field("user_agent", &self.user_agent)
            .field("timeout_ms", &self.timeout_ms)
            .field("proxy", &self.proxy)
            .finish()
    }
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            api: "https://edith.xiaohongshu.com".to_string(),
            creator: "https://creator.xiaohongshu.com".to_string(),
            customer: "https://customer.xiaohongshu.com".to_string(),
            home: "https://www.xiaohongshu.com".to_string(),
        }
    }
}

impl HostSettings {
    /// Point every host at the same base URL
    pub fn all(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            api: base.clone(),
            creator: base.clone(),
            customer: base.clone(),
            home: base,
        }
    }
}

impl Default for SignerSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_ms: 30_000,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "error".to_string(),
            verbose: false,
        }
    }
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file; missing sections keep their defaults
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            crate::Error::Config(format!("Invalid config file {}: {}", path.display(), e))
        })
    }

    /// Load settings from environment variables
    pub fn from_env() -> crate::Result<Self> {
        Self::default().merge_with_env()
    }

    /// Override settings with any environment variables that are set
    pub fn merge_with_env(mut self) -> crate::Result<Self> {
        if let Ok(cookie) = std::env::var("XHS_COOKIE") {
            self.client.cookie = Some(cookie);
        }

        if let Ok(user_agent) = std::env::var("XHS_USER_AGENT") {
            self.client.user_agent = user_agent;
        }

        if let Ok(timeout) = std::env::var("XHS_TIMEOUT_MS") {
            self.client.timeout_ms = timeout
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid timeout: {}", e)))?;
        }

        if let Ok(proxy) = std::env::var("XHS_PROXY") {
            self.client.proxy = Some(proxy);
        }

        if let Ok(endpoint) = std::env::var("XHS_SIGN_SERVER") {
            self.signer.endpoint = Some(endpoint);
        }

        if let Ok(level) = std::env::var("XHS_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.client.timeout_ms == 0 {
            return Err(crate::Error::config("timeout_ms must be greater than zero"));
        }
        if self.signer.timeout_ms == 0 {
            return Err(crate::Error::config(
                "signer timeout_ms must be greater than zero",
            ));
        }
        if self.client.user_agent.trim().is_empty() {
            return Err(crate::Error::config("user_agent must not be empty"));
        }

        for (name, host) in [
            ("api", &self.hosts.api),
            ("creator", &self.hosts.creator),
            ("customer", &self.hosts.customer),
            ("home", &self.hosts.home),
        ] {
            let url = Url::parse(host)
                .map_err(|e| crate::Error::Config(format!("Invalid {} host {}: {}", name, host, e)))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(crate::Error::Config(format!(
                    "Host {} must use http or https",
                    name
                )));
            }
        }

        if let Some(proxy) = &self.client.proxy {
            Url::parse(proxy)
                .map_err(|e| crate::Error::Config(format!("Invalid proxy {}: {}", proxy, e)))?;
        }

        if let Some(endpoint) = &self.signer.endpoint {
            Url::parse(endpoint).map_err(|e| {
                crate::Error::Config(format!("Invalid sign server {}: {}", endpoint, e))
            })?;
        }

        Ok(())
    }

    /// Overall request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.client.timeout_ms)
    }

    /// Sign service timeout
    pub fn signer_timeout(&self) -> Duration {
        Duration::from_millis(self.signer.timeout_ms)
    }
}
