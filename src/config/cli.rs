//! Command-line options.
//!
//! The CLI carries a configuration file path plus overrides for the fields
//! people change most often. Overrides are applied on top of the file (or the
//! defaults when no file is given) before validation.

use std::path::PathBuf;

use clap::Parser;

use super::types::{Config, LogFormat, LogLevel, ViewportMode};
use crate::error_handling::ConfigError;

/// Command-line options for `a11y_reporter`.
///
/// # Examples
///
/// ```bash
/// # Defaults, URLs from urls.txt
/// a11y_reporter
///
/// # Configuration file with a couple of overrides
/// a11y_reporter --config audit.toml --concurrency 5 --locale ja
///
/// # One page at a time, no screenshots
/// a11y_reporter --urls list.txt --sequential --no-screenshots
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "a11y_reporter",
    about = "Runs axe-core accessibility audits over a list of URLs and writes JSON/HTML/CSV reports."
)]
pub struct Opt {
    /// TOML configuration file
    #[arg(long, short = 'c', value_parser)]
    pub config: Option<PathBuf>,

    /// File with one URL per line
    #[arg(long, value_parser)]
    pub urls: Option<PathBuf>,

    /// Report locale (en, ja)
    #[arg(long)]
    pub locale: Option<String>,

    /// Viewport mode: pc|mobile
    #[arg(long, value_enum)]
    pub mode: Option<ViewportMode>,

    /// Output root directory
    #[arg(long, value_parser)]
    pub output_dir: Option<PathBuf>,

    /// Maximum pages in flight across all hosts (1-10)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Maximum pages in flight against a single hostname (1-10)
    #[arg(long)]
    pub per_domain_concurrency: Option<usize>,

    /// Minimum delay between requests to the same hostname, in milliseconds
    #[arg(long)]
    pub domain_delay_ms: Option<u64>,

    /// Process URLs one at a time in input order
    #[arg(long)]
    pub sequential: bool,

    /// Skip screenshot capture
    #[arg(long)]
    pub no_screenshots: bool,

    /// Disable the Chromium sandbox (only inside a trusted container)
    #[arg(long)]
    pub no_sandbox: bool,

    /// Path to the axe-core script
    #[arg(long, value_parser)]
    pub axe_script: Option<PathBuf>,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Opt {
    /// Loads the configuration file (if any) and applies the overrides.
    ///
    /// The result is not validated yet.
    pub fn resolve_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    /// Applies command-line overrides to `config`.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(urls) = &self.urls {
            config.url_list = urls.clone();
        }
        if let Some(locale) = &self.locale {
            config.locale = locale.clone();
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(dir) = &self.output_dir {
            config.output_directory = dir.clone();
        }
        if let Some(n) = self.concurrency {
            config.concurrency = n;
        }
        if let Some(n) = self.per_domain_concurrency {
            config.per_domain_concurrency = n;
        }
        if let Some(ms) = self.domain_delay_ms {
            config.domain_delay_ms = ms;
        }
        if let Some(script) = &self.axe_script {
            config.axe_script_path = script.clone();
        }
        if self.sequential {
            config.enable_concurrency = false;
        }
        if self.no_screenshots {
            config.enable_screenshots = false;
        }
        if self.no_sandbox {
            config.enable_sandbox = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opt_defaults() {
        let opt = Opt::try_parse_from(["a11y_reporter"]).unwrap();
        assert!(opt.config.is_none());
        assert!(!opt.sequential);
        let config = opt.resolve_config().unwrap();
        assert_eq!(config.concurrency, Config::default().concurrency);
    }

    #[test]
    fn test_opt_overrides() {
        let opt = Opt::try_parse_from([
            "a11y_reporter",
            "--urls",
            "list.txt",
            "--mode",
            "mobile",
            "--concurrency",
            "7",
            "--per-domain-concurrency",
            "2",
            "--domain-delay-ms",
            "250",
            "--sequential",
            "--no-screenshots",
            "--no-sandbox",
        ])
        .unwrap();
        let config = opt.resolve_config().unwrap();
        assert_eq!(config.url_list, PathBuf::from("list.txt"));
        assert_eq!(config.mode, ViewportMode::Mobile);
        assert_eq!(config.concurrency, 7);
        assert_eq!(config.per_domain_concurrency, 2);
        assert_eq!(config.domain_delay_ms, 250);
        assert!(!config.enable_concurrency);
        assert!(!config.enable_screenshots);
        assert!(!config.enable_sandbox);
    }

    #[test]
    fn test_opt_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.toml");
        std::fs::write(&path, "concurrency = 2\nlocale = \"ja\"\n").unwrap();

        let opt = Opt::try_parse_from([
            "a11y_reporter",
            "--config",
            path.to_str().unwrap(),
            "--concurrency",
            "4",
        ])
        .unwrap();
        let config = opt.resolve_config().unwrap();
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.locale, "ja");
    }

    #[test]
    fn test_opt_missing_config_file() {
        let opt =
            Opt::try_parse_from(["a11y_reporter", "--config", "/nonexistent/audit.toml"]).unwrap();
        assert!(matches!(
            opt.resolve_config(),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_opt_rejects_invalid_mode() {
        assert!(Opt::try_parse_from(["a11y_reporter", "--mode", "tablet"]).is_err());
    }
}
