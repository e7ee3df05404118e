//! Xiaohongshu web API client
//!
//! A signed HTTP client for the Xiaohongshu web API. Every call goes through
//! one pipeline that signs the exact request being sent and classifies the
//! response into data or a typed failure.
//!
//! # Architecture
//!
//! - **Session**: cookie state, signer seams and signed header composition
//! - **Client**: the request pipeline, response classification, business
//!   endpoints and an HTML fallback for notes
//! - **CLI**: the `xhs` binary printing results as JSON
//!
//! The signature algorithm is not part of this crate. Implement [`Signer`]
//! and [`CommonDeriver`], or point [`RemoteSigner`] at a sign service.
//!
//! # Usage
//!
//! ```bash
//! xhs --sign-server http://127.0.0.1:5005 --cookie "a1=..." me
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use xhs_client::{Error, Settings, XhsClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut settings = Settings::default();
//! settings.signer.endpoint = Some("http://127.0.0.1:5005".to_string());
//! let client = XhsClient::from_settings(settings)?;
//!
//! match client.get_note_by_id("64f1c2aa000000001e03b7f1").await {
//!     Ok(note) => println!("{}", note),
//!     Err(Error::NeedVerification { challenge, .. }) => {
//!         eprintln!("captcha required: {}", challenge.verify_uuid)
//!     }
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod types;
pub mod utils;

pub use client::{XhsClient, endpoints::SearchQuery};
pub use config::Settings;
pub use error::{Error, ErrorCode, Result};
pub use session::{CommonDeriver, RemoteSigner, Signature, Signer};
pub use types::{ChallengeInfo, Endpoint, Payload, RequestOptions, SearchNoteType, SearchSortType};
