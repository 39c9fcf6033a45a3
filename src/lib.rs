//! a11y_reporter library: batch accessibility audits with axe-core
//!
//! This library loads every URL of a list in headless Chromium, runs the
//! axe-core rule engine against the rendered page and writes per-page JSON and
//! HTML reports, an optional screenshot per page and a run-wide CSV log of
//! every violating node.
//!
//! # Example
//!
//! ```no_run
//! use a11y_reporter::{run_audit, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     url_list: std::path::PathBuf::from("urls.txt"),
//!     concurrency: 4,
//!     per_domain_concurrency: 1,
//!     domain_delay_ms: 3000,
//!     ..Default::default()
//! };
//!
//! let report = run_audit(config).await?;
//! println!("Audited {} URLs: {} succeeded, {} failed",
//!          report.summary.total, report.summary.succeeded, report.summary.failed);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime and, for [`run_audit`], a Chromium
//! or Chrome binary that `chromiumoxide` can find.

pub mod aggregate;
pub mod analyzer;
mod app;
pub mod browser;
pub mod config;
pub mod error_handling;
pub mod initialization;
pub mod intake;
pub mod processor;
pub mod report;
mod run;
pub mod scheduler;
pub mod security;
pub mod summary;
mod utils;

// Re-export public API
pub use aggregate::BatchSummary;
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::AuditError;
pub use run::{run_audit, run_audit_with, AuditReport};
