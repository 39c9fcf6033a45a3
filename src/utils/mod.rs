//! Small shared helpers.
//!
//! This module provides:
//! - Error message sanitization and truncation
//! - Panic payload formatting

pub mod sanitize;

pub use sanitize::{panic_message, sanitize_and_truncate_error_message};
