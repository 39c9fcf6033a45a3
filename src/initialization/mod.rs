//! Application initialization.
//!
//! This module provides functions to set up process-wide resources:
//! - Logger (plain or JSON output)
//! - Run resources loaded once at startup (template, stylesheet, axe-core script)

mod logger;
mod resources;

pub use logger::init_logger_with;
pub use resources::{builtin_styles, load_resources, RunResources};
