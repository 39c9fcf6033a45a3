//! Per-URL processing outcomes.

use chrono::{DateTime, Utc};

use crate::error_handling::{ErrorType, PageError};
use crate::utils::sanitize_and_truncate_error_message;

/// Failure details recorded for one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureInfo {
    pub message: String,
    pub kind: ErrorType,
    pub timestamp: DateTime<Utc>,
}

/// Result of processing one URL. Exactly one is produced per accepted URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingOutcome {
    Success {
        url: String,
        violations: usize,
        screenshot: bool,
    },
    Failure {
        url: String,
        error: FailureInfo,
    },
}

impl ProcessingOutcome {
    /// Builds a failure outcome from a page error.
    pub fn failure(url: impl Into<String>, error: &PageError) -> Self {
        ProcessingOutcome::Failure {
            url: url.into(),
            error: FailureInfo {
                message: sanitize_and_truncate_error_message(&error.to_string()),
                kind: error.error_type(),
                timestamp: Utc::now(),
            },
        }
    }

    pub fn url(&self) -> &str {
        match self {
            ProcessingOutcome::Success { url, .. } | ProcessingOutcome::Failure { url, .. } => url,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProcessingOutcome::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_outcome_carries_kind() {
        let outcome = ProcessingOutcome::failure(
            "https://example.com/",
            &PageError::NotHtml("application/pdf".into()),
        );
        assert!(!outcome.is_success());
        assert_eq!(outcome.url(), "https://example.com/");
        match outcome {
            ProcessingOutcome::Failure { error, .. } => {
                assert_eq!(error.kind, ErrorType::NotHtml);
                assert!(error.message.contains("application/pdf"));
            }
            _ => unreachable!(),
        }
    }
}
