//! Type definitions for the client
//!
//! This module contains the data structures exchanged with the request
//! pipeline: per-call options, response envelopes and search options.

pub mod envelope;
pub mod request;
pub mod search;
pub mod serde_helpers;

pub use envelope::{ChallengeInfo, Payload, ResponseEnvelope};
pub use request::{Endpoint, RequestOptions};
pub use search::{SearchNoteType, SearchSortType};
