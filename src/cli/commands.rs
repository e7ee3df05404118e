//! Subcommand execution

use anyhow::{Context, Result};
use serde_json::Value;
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    XhsClient,
    config::{ConfigLoader, Settings, default_config_path},
    session::Unsigned,
    types::{SearchNoteType, SearchSortType},
    utils::version,
};

/// Options shared by every subcommand
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Explicit config file; the per-user default is used when absent
    pub config: Option<PathBuf>,
    /// Session cookie override
    pub cookie: Option<String>,
    /// Sign service override
    pub sign_server: Option<String>,
    /// Debug logging
    pub verbose: bool,
}

/// What to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// One note, through the API or from its explore page
    Note { id: String, html: bool },
    /// Keyword search
    Search {
        keyword: String,
        page: u32,
        page_size: u32,
        sort: SearchSortType,
        note_type: SearchNoteType,
    },
    /// Another user's profile
    User { id: String },
    /// The cookie owner's profile
    Me,
}

impl Action {
    /// Whether the action goes through the signed API
    pub fn needs_signer(&self) -> bool {
        !matches!(self, Action::Note { html: true, .. })
    }
}

/// Load settings: defaults, then config file, then environment, then flags
pub fn load_settings(args: &GlobalArgs) -> Result<Settings> {
    let path = args.config.clone().or_else(default_config_path);
    let settings = ConfigLoader::new()
        .with_cookie(args.cookie.clone())
        .with_sign_server(args.sign_server.clone())
        .with_verbose(args.verbose)
        .load(path.as_deref())
        .context("failed to load configuration")?;
    Ok(settings)
}

/// Install the stderr tracing subscriber.
///
/// `RUST_LOG` wins over the configured level.
pub fn init_logging(settings: &Settings) {
    let default_level = if settings.logging.verbose {
        "debug".to_string()
    } else {
        settings.logging.level.clone()
    };

    // Ignored when a subscriber is already installed
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Build the client an action needs
pub fn build_client(settings: Settings, action: &Action) -> Result<XhsClient> {
    let client = if action.needs_signer() {
        XhsClient::from_settings(settings)?
    } else {
        XhsClient::new(settings, Arc::new(Unsigned), Arc::new(Unsigned))?
    };
    Ok(client)
}

/// Run one action and return its JSON result
pub async fn run(settings: Settings, action: Action) -> Result<Value> {
    tracing::debug!("xhs v{} running {:?}", version::get_version(), action);

    let client = build_client(settings, &action)?;

    let value = match action {
        Action::Note { id, html: true } => client.get_note_by_id_from_html(&id).await?,
        Action::Note { id, html: false } => client.get_note_by_id(&id).await?,
        Action::Search {
            keyword,
            page,
            page_size,
            sort,
            note_type,
        } => {
            client
                .get_note_by_keyword(&keyword, page, page_size, sort, note_type)
                .await?
        }
        Action::User { id } => client.get_user_info(&id).await?,
        Action::Me => client.get_self_info().await?,
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, config::settings::HostSettings};
    use std::io::Write;
    use tempfile::NamedTempFile;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_needs_signer() {
        assert!(Action::Me.needs_signer());
        assert!(
            Action::Note {
                id: "n".into(),
                html: false
            }
            .needs_signer()
        );
        assert!(
            !Action::Note {
                id: "n".into(),
                html: true
            }
            .needs_signer()
        );
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[client]\ncookie = \"a1=file\"\n\n[signer]\nendpoint = \"http://file:5005\""
        )
        .unwrap();

        let args = GlobalArgs {
            config: Some(file.path().to_path_buf()),
            cookie: Some("a1=flag".to_string()),
            sign_server: None,
            verbose: true,
        };
        let settings = load_settings(&args).unwrap();

        assert_eq!(settings.client.cookie.as_deref(), Some("a1=flag"));
        assert!(settings.logging.verbose);
        assert!(settings.signer.endpoint.is_some());
    }

    #[test]
    fn test_bad_sign_server_flag_fails_at_load() {
        let args = GlobalArgs {
            config: Some(PathBuf::from("/nonexistent/xhs-client/config.toml")),
            sign_server: Some("not a url".to_string()),
            ..GlobalArgs::default()
        };
        let err = load_settings(&args).unwrap_err();

        assert!(format!("{:#}", err).contains("Invalid sign server"));
        assert!(matches!(err.downcast::<Error>().unwrap(), Error::Config(_)));
    }

    #[tokio::test]
    async fn test_signed_action_without_sign_server() {
        let err = run(Settings::default(), Action::Me).await.unwrap_err();
        let err = err.downcast::<Error>().unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_html_note_without_sign_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/explore/n1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<script>window.__INITIAL_STATE__={"note":{"noteDetailMap":{"n1":{"note":{"noteId":"n1"}}}}}</script>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let mut settings = Settings::default();
        settings.hosts = HostSettings::all(server.uri());

        let value = run(
            settings,
            Action::Note {
                id: "n1".to_string(),
                html: true,
            },
        )
        .await
        .unwrap();
        assert_eq!(value, serde_json::json!({"note_id": "n1"}));
    }
}
