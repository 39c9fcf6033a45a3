//! Configuration types.
//!
//! `Config` is the single, fully-defaulted settings record for a run. It is
//! deserialized from a flat TOML file, adjusted by command-line overrides, and
//! validated once before any browser or network activity.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::config::constants::{
    DEFAULT_BLOCKED_DOMAINS, DEFAULT_MAX_PAGE_SIZE, DEFAULT_TAGS, VIEWPORT_MOBILE, VIEWPORT_PC,
};
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Browser viewport emulation mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ViewportMode {
    /// Desktop viewport (1024x768)
    Pc,
    /// Mobile viewport (375x812, touch enabled)
    Mobile,
}

impl ViewportMode {
    /// Returns the viewport size as `(width, height)`.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            ViewportMode::Pc => VIEWPORT_PC,
            ViewportMode::Mobile => VIEWPORT_MOBILE,
        }
    }

    /// Whether the browser should emulate a mobile device.
    pub fn is_mobile(self) -> bool {
        matches!(self, ViewportMode::Mobile)
    }
}

/// Screenshot image format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenshotFormat {
    Png,
    Jpeg,
    Webp,
}

impl ScreenshotFormat {
    /// File extension used for persisted screenshots.
    pub fn extension(self) -> &'static str {
        match self {
            ScreenshotFormat::Png => "png",
            ScreenshotFormat::Jpeg => "jpg",
            ScreenshotFormat::Webp => "webp",
        }
    }

    /// Whether the format honours a quality setting.
    pub fn supports_quality(self) -> bool {
        !matches!(self, ScreenshotFormat::Png)
    }
}

/// Screenshot settings resolved from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenshotSettings {
    pub format: ScreenshotFormat,
    /// Quality (0-100), `None` for lossless formats
    pub quality: Option<u8>,
}

/// Run configuration.
///
/// Every field has a default, so a TOML file only needs the keys it changes.
///
/// # Examples
///
/// ```no_run
/// use a11y_reporter::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     url_list: PathBuf::from("urls.txt"),
///     concurrency: 5,
///     per_domain_concurrency: 2,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// File with one URL per line
    pub url_list: PathBuf,

    /// Report locale (`en`, `ja`); unknown locales fall back to English
    pub locale: String,

    /// axe-core rule tags to run
    pub tags: Vec<String>,

    /// Viewport emulation mode
    pub mode: ViewportMode,

    /// Maximum pages in flight across all hosts
    pub concurrency: usize,

    /// Maximum pages in flight against a single hostname
    pub per_domain_concurrency: usize,

    /// Minimum delay between two dispatches to the same hostname, in milliseconds
    pub domain_delay_ms: u64,

    /// Process URLs concurrently (false = strict input order)
    pub enable_concurrency: bool,

    /// Capture a full-page screenshot for each report
    pub enable_screenshots: bool,

    /// Screenshot image format
    pub screenshot_format: ScreenshotFormat,

    /// Screenshot quality for jpeg/webp (0-100)
    pub screenshot_quality: u8,

    /// Root directory for run output
    pub output_directory: PathBuf,

    /// HTML report template (built-in template when unset)
    pub template_path: Option<PathBuf>,

    /// Stylesheet inlined into reports (built-in stylesheet when unset)
    pub styles_path: Option<PathBuf>,

    /// axe-core script injected into every page
    pub axe_script_path: PathBuf,

    /// axe-core locale file with translated rule text
    pub axe_locale_path: Option<PathBuf>,

    /// Spaces used to indent persisted JSON (0 = compact)
    pub json_indentation: usize,

    /// Navigation timeout in milliseconds
    pub navigation_timeout_ms: u64,

    /// Hostnames or CIDR ranges allowed (empty = allow all not blocked)
    pub allowed_domains: Vec<String>,

    /// Hostnames or CIDR ranges never visited
    pub blocked_domains: Vec<String>,

    /// Keep the Chromium sandbox enabled
    pub enable_sandbox: bool,

    /// Largest declared response size in bytes (0 = unlimited)
    pub max_page_size: u64,

    /// Write a CSV log of every violation node
    pub enable_csv: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url_list: PathBuf::from("urls.txt"),
            locale: "en".to_string(),
            tags: DEFAULT_TAGS.iter().map(|t| t.to_string()).collect(),
            mode: ViewportMode::Pc,
            concurrency: 3,
            per_domain_concurrency: 1,
            domain_delay_ms: 1_000,
            enable_concurrency: true,
            enable_screenshots: true,
            screenshot_format: ScreenshotFormat::Jpeg,
            screenshot_quality: 80,
            output_directory: PathBuf::from("results"),
            template_path: None,
            styles_path: None,
            axe_script_path: PathBuf::from("axe.min.js"),
            axe_locale_path: None,
            json_indentation: 2,
            navigation_timeout_ms: 30_000,
            allowed_domains: Vec::new(),
            blocked_domains: DEFAULT_BLOCKED_DOMAINS
                .iter()
                .map(|d| d.to_string())
                .collect(),
            enable_sandbox: true,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            enable_csv: true,
        }
    }
}

impl Config {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Loads a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Navigation timeout as a `Duration`.
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    /// Per-domain dispatch delay as a `Duration`.
    pub fn domain_delay(&self) -> Duration {
        Duration::from_millis(self.domain_delay_ms)
    }

    /// Screenshot settings, or `None` when screenshots are disabled.
    pub fn screenshot_settings(&self) -> Option<ScreenshotSettings> {
        self.enable_screenshots.then(|| ScreenshotSettings {
            format: self.screenshot_format,
            quality: self
                .screenshot_format
                .supports_quality()
                .then_some(self.screenshot_quality),
        })
    }
}
