//! Command line interface logic
//!
//! The `xhs` binary parses arguments; everything it does after that lives
//! here so it can be tested without spawning a process.

pub mod commands;

pub use commands::{Action, GlobalArgs, init_logging, load_settings, run};
