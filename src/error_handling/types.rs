//! Error type definitions.
//!
//! This module defines all error, warning, and info types used throughout the application.

use std::path::PathBuf;
use std::time::Duration;

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::processor::FilenameError;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Configuration errors. All of them are fatal before any network activity.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// One entry per violated rule.
    #[error("Invalid configuration:\n  - {}", .0.join("\n  - "))]
    Invalid(Vec<String>),
}

/// Domain policy construction errors.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Invalid CIDR entry '{entry}' in {list} list: {reason}")]
    InvalidCidr {
        list: &'static str,
        entry: String,
        reason: String,
    },
}

/// URL intake errors.
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Failed to read URL list {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No URLs accepted for processing ({invalid} invalid, {blocked} blocked)")]
    NoAcceptedUrls { invalid: usize, blocked: usize },
}

/// Per-page failures. These never escape the page processor; each one is
/// recorded as a failed outcome for its URL.
#[derive(Error, Debug)]
pub enum PageError {
    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Navigation timed out after {}ms", .0.as_millis())]
    NavigationTimeout(Duration),

    #[error("Main document is not HTML (content type: {0})")]
    NotHtml(String),

    #[error("Response of {size} bytes exceeds the page size limit of {limit} bytes")]
    PageTooLarge { size: u64, limit: u64 },

    #[error("Screenshot capture failed: {0}")]
    Screenshot(String),

    #[error("Accessibility analysis failed: {0}")]
    Analyzer(String),

    #[error("Invalid analysis result: {0}")]
    InvalidResult(String),

    #[error("Cannot derive report filename: {0}")]
    Filename(#[from] FilenameError),

    #[error("Failed to write {}: {source}", path.display())]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Page task panicked: {0}")]
    Panic(String),

    #[error("Page task cancelled: {0}")]
    Cancelled(String),
}

impl PageError {
    /// Classifies this error for statistics and failure outcomes.
    pub fn error_type(&self) -> ErrorType {
        match self {
            PageError::Navigation(_) => ErrorType::NavigationError,
            PageError::NavigationTimeout(_) => ErrorType::NavigationTimeout,
            PageError::NotHtml(_) => ErrorType::NotHtml,
            PageError::PageTooLarge { .. } => ErrorType::PageTooLarge,
            PageError::Screenshot(_) => ErrorType::ScreenshotError,
            PageError::Analyzer(_) => ErrorType::AnalyzerError,
            PageError::InvalidResult(_) => ErrorType::InvalidAnalysisResult,
            PageError::Filename(_) => ErrorType::FilenameError,
            PageError::ArtifactWrite { .. } => ErrorType::ArtifactWriteError,
            PageError::Browser(_) => ErrorType::BrowserError,
            PageError::Panic(_) => ErrorType::TaskPanic,
            PageError::Cancelled(_) => ErrorType::TaskCancelled,
        }
    }
}

/// Fatal, run-level errors. Any of these stops the batch and exits non-zero.
#[derive(Error, Debug)]
pub enum AuditError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Intake(#[from] IntakeError),

    /// Template, stylesheet, axe-core script or output directory could not be loaded or created.
    #[error("Resource error: {0:#}")]
    Resource(#[from] anyhow::Error),

    #[error("Failed to launch browser: {0}")]
    BrowserLaunch(String),

    #[error("Interrupted by signal")]
    Interrupted,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuditError {
    /// Short classification used in the fatal error line.
    pub fn kind(&self) -> &'static str {
        match self {
            AuditError::Config(_) => "ConfigurationError",
            AuditError::Policy(_) => "DomainPolicyError",
            AuditError::Intake(IntakeError::Read { .. }) => "UrlListError",
            AuditError::Intake(IntakeError::NoAcceptedUrls { .. }) => "NoAcceptedUrls",
            AuditError::Resource(_) => "ResourceError",
            AuditError::BrowserLaunch(_) => "BrowserLaunchError",
            AuditError::Interrupted => "Interrupted",
            AuditError::Internal(_) => "InternalError",
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            AuditError::Interrupted => 130,
            _ => 1,
        }
    }
}

/// Summary builder errors.
#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Run directory {} does not exist or is not accessible: {source}", path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Run directory {} is outside the working directory {}", path.display(), cwd.display())]
    OutsideWorkingDirectory { path: PathBuf, cwd: PathBuf },

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Types of errors that can occur while processing a page.
///
/// This enum categorizes actual error conditions - failures that prevent a
/// report from being produced for a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // Navigation
    NavigationError,
    NavigationTimeout,
    NotHtml,
    PageTooLarge,
    // Capture and analysis
    ScreenshotError,
    AnalyzerError,
    InvalidAnalysisResult,
    // Persistence
    FilenameError,
    ArtifactWriteError,
    // Runtime
    BrowserError,
    TaskPanic,
    TaskCancelled,
}

/// Types of warnings that can occur while processing a page.
///
/// Warnings never fail a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum WarningType {
    ScreenshotUnavailable, // Screenshot failed, report written without one
    PageCloseFailed,       // Page could not be closed cleanly
    CsvWriteFailed,        // A CSV row could not be written
}

/// Types of informational metrics recorded while processing pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    ScreenshotCaptured,
    NoViolations, // Page passed all automatic checks
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::NavigationError => "Navigation error",
            ErrorType::NavigationTimeout => "Navigation timeout",
            ErrorType::NotHtml => "Non-HTML document",
            ErrorType::PageTooLarge => "Page too large",
            ErrorType::ScreenshotError => "Screenshot error",
            ErrorType::AnalyzerError => "Analyzer error",
            ErrorType::InvalidAnalysisResult => "Invalid analysis result",
            ErrorType::FilenameError => "Filename derivation error",
            ErrorType::ArtifactWriteError => "Artifact write error",
            ErrorType::BrowserError => "Browser error",
            ErrorType::TaskPanic => "Task panic",
            ErrorType::TaskCancelled => "Task cancelled",
        }
    }
}

impl WarningType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningType::ScreenshotUnavailable => "Screenshot unavailable",
            WarningType::PageCloseFailed => "Page close failed",
            WarningType::CsvWriteFailed => "CSV write failed",
        }
    }
}

impl InfoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::ScreenshotCaptured => "Screenshot captured",
            InfoType::NoViolations => "No violations found",
        }
    }
}
