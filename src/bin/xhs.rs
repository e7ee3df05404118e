//! Command line client for the Xiaohongshu web API
//!
//! Fetches notes, searches and profiles and prints them as JSON on stdout.
//! Signed API calls go through an external sign service.
//!
//! # Usage
//!
//! ```bash
//! xhs --sign-server http://127.0.0.1:5005 --cookie "a1=...; web_session=..." note 64f1c2...
//! xhs note 64f1c2... --html
//! xhs search coffee --sort popularity_descending --page-size 10
//! ```
//!
//! # Exit status
//!
//! `0` on success. On failure the error goes to stderr and the exit status is `1`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use xhs_client::{
    cli::{self, Action, GlobalArgs},
    types::{SearchNoteType, SearchSortType},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "xhs")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Session cookie string
    #[arg(long, env = "XHS_COOKIE", hide_env_values = true, global = true)]
    cookie: Option<String>,

    /// Sign service base URL
    #[arg(long, env = "XHS_SIGN_SERVER", value_name = "URL", global = true)]
    sign_server: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a note
    Note {
        /// Note id
        id: String,

        /// Read the public explore page instead of the signed API
        #[arg(long)]
        html: bool,
    },

    /// Search notes by keyword
    Search {
        /// Search keyword
        keyword: String,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        page_size: u32,

        /// general, popularity_descending or time_descending
        #[arg(long, default_value = "general")]
        sort: SearchSortType,

        /// all, video or image
        #[arg(long, default_value = "all")]
        note_type: SearchNoteType,
    },

    /// Fetch another user's profile
    User {
        /// User id
        id: String,
    },

    /// Fetch the cookie owner's profile
    Me,
}

impl Cli {
    fn split(self) -> (GlobalArgs, Action) {
        let globals = GlobalArgs {
            config: self.config,
            cookie: self.cookie,
            sign_server: self.sign_server,
            verbose: self.verbose,
        };
        let action = match self.command {
            Command::Note { id, html } => Action::Note { id, html },
            Command::Search {
                keyword,
                page,
                page_size,
                sort,
                note_type,
            } => Action::Search {
                keyword,
                page,
                page_size,
                sort,
                note_type,
            },
            Command::User { id } => Action::User { id },
            Command::Me => Action::Me,
        };
        (globals, action)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (globals, action) = Cli::parse().split();

    let settings = match cli::load_settings(&globals) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    cli::init_logging(&settings);

    match cli::run(settings, action).await {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
