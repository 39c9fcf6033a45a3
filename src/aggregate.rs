//! Batch outcome aggregation.

use log::{info, warn};

use crate::error_handling::ErrorType;
use crate::processor::ProcessingOutcome;

/// A URL that failed, with its error kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUrl {
    pub url: String,
    pub kind: ErrorType,
    pub message: String,
}

/// Final tally of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Violating nodes across all successful pages
    pub violations: usize,
    pub screenshots: usize,
    /// Sorted by URL so the summary does not depend on completion order
    pub failures: Vec<FailedUrl>,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[ProcessingOutcome]) -> Self {
        let mut summary = BatchSummary {
            total: outcomes.len(),
            ..BatchSummary::default()
        };
        for outcome in outcomes {
            match outcome {
                ProcessingOutcome::Success {
                    violations,
                    screenshot,
                    ..
                } => {
                    summary.succeeded += 1;
                    summary.violations += violations;
                    summary.screenshots += usize::from(*screenshot);
                }
                ProcessingOutcome::Failure { url, error } => {
                    summary.failed += 1;
                    summary.failures.push(FailedUrl {
                        url: url.clone(),
                        kind: error.kind,
                        message: error.message.clone(),
                    });
                }
            }
        }
        summary
            .failures
            .sort_by(|a, b| a.url.cmp(&b.url).then_with(|| a.message.cmp(&b.message)));
        summary
    }

    /// Logs the tally and every failed URL.
    pub fn log(&self) {
        info!(
            "Processing completed: {} succeeded, {} failed ({} total, {} violations found)",
            self.succeeded, self.failed, self.total, self.violations
        );
        if !self.failures.is_empty() {
            warn!("Failed URLs:");
            for failure in &self.failures {
                warn!("  - {} [{}] {}", failure.url, failure.kind, failure.message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::PageError;
    use std::time::Duration;

    fn success(url: &str, violations: usize) -> ProcessingOutcome {
        ProcessingOutcome::Success {
            url: url.to_string(),
            violations,
            screenshot: true,
        }
    }

    #[test]
    fn test_counts_add_up() {
        let outcomes = vec![
            success("https://a.example/", 3),
            ProcessingOutcome::failure(
                "https://b.example/",
                &PageError::NavigationTimeout(Duration::from_secs(30)),
            ),
            success("https://c.example/", 0),
        ];
        let summary = BatchSummary::from_outcomes(&outcomes);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded + summary.failed, summary.total);
        assert_eq!(summary.violations, 3);
        assert_eq!(summary.screenshots, 2);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].kind, ErrorType::NavigationTimeout);
    }

    #[test]
    fn test_order_insensitive() {
        let a = success("https://a.example/", 1);
        let b = ProcessingOutcome::failure("https://b.example/", &PageError::NotHtml("x".into()));
        let c = ProcessingOutcome::failure("https://c.example/", &PageError::NotHtml("y".into()));

        let forward = BatchSummary::from_outcomes(&[a.clone(), b.clone(), c.clone()]);
        let backward = BatchSummary::from_outcomes(&[c, b, a]);
        assert_eq!(forward.succeeded, backward.succeeded);
        assert_eq!(forward.failed, backward.failed);
        assert_eq!(
            forward.failures.iter().map(|f| &f.url).collect::<Vec<_>>(),
            backward.failures.iter().map(|f| &f.url).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_empty_batch() {
        let summary = BatchSummary::from_outcomes(&[]);
        assert_eq!(summary, BatchSummary::default());
        summary.log();
    }
}
