//! Summary page builder (CLI binary).
//!
//! Run after `a11y_reporter` has finished:
//!
//! ```bash
//! a11y_summary --path ./results/2025-01-31_09-30-00
//! ```

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use a11y_reporter::config::{LogFormat, LogLevel};
use a11y_reporter::initialization::init_logger_with;
use a11y_reporter::summary::{build_summary, CollectLimits, SummaryOptions};

/// Command-line options for `a11y_summary`.
#[derive(Debug, Parser)]
#[command(
    name = "a11y_summary",
    about = "Builds summary/index.html from the JSON results of an a11y_reporter run."
)]
struct SummaryOpt {
    /// Run directory (must be inside the current directory)
    #[arg(long, value_parser)]
    path: PathBuf,

    /// Summary locale (en, ja)
    #[arg(long, default_value = "en")]
    locale: String,

    /// Stylesheet to inline instead of the built-in one
    #[arg(long, value_parser)]
    styles: Option<PathBuf>,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[tokio::main]
async fn main() -> Result<()> {
    let opt = SummaryOpt::parse();
    init_logger_with(opt.log_level.into(), LogFormat::Plain)
        .context("Failed to initialize logger")?;

    let cwd = std::env::current_dir().context("Failed to determine the current directory")?;
    let options = SummaryOptions {
        path: opt.path,
        locale: opt.locale,
        styles: opt.styles,
        limits: CollectLimits::default(),
    };

    match build_summary(&options, &cwd).await {
        Ok(index) => {
            println!("Summary page generated at {}", index.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("a11y_summary error: {}", e);
            process::exit(1);
        }
    }
}
