//! Utility functions and helpers
//!
//! This module contains utility functions used throughout the crate.

pub mod normalize;
pub mod search_id;
pub mod version;

pub use normalize::{camel_to_snake, normalize_keys};
pub use search_id::search_id;
pub use version::{VERSION, get_version};
