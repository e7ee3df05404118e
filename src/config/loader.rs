//! Layered settings resolution
//!
//! Sources, lowest to highest priority: built-in defaults, the TOML file,
//! `XHS_*` environment variables, explicit overrides (command line flags).
//! The merged result is validated once, after every layer is applied.

use crate::{Result, config::Settings};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Settings loader carrying the highest-priority overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Session cookie override
    cookie: Option<String>,
    /// Sign service override
    sign_server: Option<String>,
    /// Force debug logging
    verbose: bool,
}

impl ConfigLoader {
    /// Loader without overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the session cookie
    pub fn with_cookie(mut self, cookie: Option<String>) -> Self {
        self.cookie = cookie;
        self
    }

    /// Override the sign service endpoint
    pub fn with_sign_server(mut self, endpoint: Option<String>) -> Self {
        self.sign_server = endpoint;
        self
    }

    /// Turn on debug logging
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Resolve settings from every source and validate the result.
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load(&self, config_file: Option<&Path>) -> Result<Settings> {
        let mut settings = match config_file {
            Some(path) if path.exists() => {
                info!("Loading configuration from file: {:?}", path);
                Settings::from_file(path)?
            }
            Some(path) => {
                warn!("Configuration file not found: {:?}, using defaults", path);
                Settings::default()
            }
            None => Settings::default(),
        };

        debug!("Applying environment variable overrides");
        settings = settings.merge_with_env()?;
        self.apply_overrides(&mut settings);

        settings.validate()?;
        debug!("Resolved configuration: {:?}", settings);

        Ok(settings)
    }

    fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(cookie) = &self.cookie {
            settings.client.cookie = Some(cookie.clone());
        }
        if let Some(endpoint) = &self.sign_server {
            debug!("Sign service set to {}", endpoint);
            settings.signer.endpoint = Some(endpoint.clone());
        }
        if self.verbose {
            settings.logging.verbose = true;
        }
    }
}

/// Default configuration file location: `<config dir>/xhs-client/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("xhs-client").join("config.toml"))
}
