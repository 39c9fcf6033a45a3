//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (limits, defaults, validation ranges)
//! - The `Config` record and its TOML loader
//! - CLI option types and parsing
//! - Exhaustive validation

mod cli;
mod constants;
mod types;
mod validation;

// Re-export all constants
pub use cli::Opt;
pub use constants::*;
pub use types::{
    Config, LogFormat, LogLevel, ScreenshotFormat, ScreenshotSettings, ViewportMode,
};
