//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `a11y_reporter` library that handles:
//! - Command-line argument parsing and configuration loading
//! - Logger initialization
//! - User-facing output and exit codes
//!
//! All core functionality is implemented in the library crate.

use std::error::Error as _;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use a11y_reporter::config::Opt;
use a11y_reporter::initialization::init_logger_with;
use a11y_reporter::{run_audit, AuditError};

fn report_fatal(error: &AuditError) -> ! {
    eprintln!("a11y_reporter error [{}]: {}", error.kind(), error);
    let mut source = error.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {}", cause);
        source = cause.source();
    }
    process::exit(error.exit_code());
}

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();

    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    let config = match opt.resolve_config() {
        Ok(config) => config,
        Err(e) => report_fatal(&AuditError::from(e)),
    };

    match run_audit(config).await {
        Ok(report) => {
            println!(
                "✅ Audited {} URL{} ({} succeeded, {} failed) in {:.1}s",
                report.summary.total,
                if report.summary.total == 1 { "" } else { "s" },
                report.summary.succeeded,
                report.summary.failed,
                report.elapsed_seconds
            );
            println!("Reports saved in {}", report.run_directory.display());
            Ok(())
        }
        Err(e) => report_fatal(&e),
    }
}
