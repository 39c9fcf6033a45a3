//! Error handling and processing statistics.
//!
//! This module provides:
//! - Typed errors for each stage (configuration, policy, intake, page, run)
//! - Processing statistics tracking (errors, warnings, info metrics)
//!
//! Per-page counters are categorized into:
//! - **Errors**: Failures that prevent a report from being produced
//! - **Warnings**: Degraded results (missing screenshot, unclean page close)
//! - **Info**: Informational metrics

mod stats;
mod types;

// Re-export public API
pub use stats::ProcessingStats;
pub use types::{
    AuditError, ConfigError, ErrorType, InfoType, InitializationError, IntakeError, PageError,
    PolicyError, SummaryError, WarningType,
};
