//! Configuration management for the client
//!
//! This module handles loading and managing configuration settings
//! for both the library and the `xhs` command line tool.

pub mod loader;
pub mod settings;

pub use loader::{ConfigLoader, default_config_path};
pub use settings::Settings;
