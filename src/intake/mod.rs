//! URL intake.
//!
//! Reads the URL list and splits it into three disjoint sets:
//! - **accepted**: valid http(s) URLs the domain policy allows
//! - **invalid**: lines that are not absolute http(s) URLs
//! - **blocked**: valid URLs the domain policy rejects
//!
//! Invalid and blocked entries are logged and dropped, never retried.

mod target;

use std::path::Path;

use log::{debug, info, warn};

use crate::error_handling::IntakeError;
use crate::security::{DomainPolicy, PolicyDecision};

pub use target::{host_key, InvalidReason, TargetUrl};

/// A rejected line with the reason it was rejected.
#[derive(Debug, Clone)]
pub struct Rejected<R> {
    pub line: String,
    pub reason: R,
}

/// Classification of one URL list.
#[derive(Debug, Default)]
pub struct IntakeReport {
    pub accepted: Vec<TargetUrl>,
    pub invalid: Vec<Rejected<InvalidReason>>,
    pub blocked: Vec<Rejected<PolicyDecision>>,
    /// Lines starting with `#`
    pub comments: usize,
}

impl IntakeReport {
    /// Logs every rejected entry and the totals.
    pub fn log_summary(&self) {
        if !self.invalid.is_empty() {
            warn!(
                "{} invalid URL{} skipped:",
                self.invalid.len(),
                plural(self.invalid.len())
            );
            for rejected in &self.invalid {
                warn!("  - {} ({})", rejected.line, rejected.reason);
            }
        }
        if !self.blocked.is_empty() {
            warn!(
                "{} URL{} blocked by domain policy:",
                self.blocked.len(),
                plural(self.blocked.len())
            );
            for rejected in &self.blocked {
                warn!("  - {} ({})", rejected.line, rejected.reason);
            }
        }
        if self.comments > 0 {
            info!(
                "{} comment line{} ignored",
                self.comments,
                plural(self.comments)
            );
        }
        info!(
            "Found {} valid URL{} to process",
            self.accepted.len(),
            plural(self.accepted.len())
        );
    }

    /// Returns the accepted URLs, or an error if there are none.
    pub fn into_accepted(self) -> Result<Vec<TargetUrl>, IntakeError> {
        if self.accepted.is_empty() {
            return Err(IntakeError::NoAcceptedUrls {
                invalid: self.invalid.len(),
                blocked: self.blocked.len(),
            });
        }
        Ok(self.accepted)
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Classifies every non-empty, non-comment line of `text`.
///
/// Lines are trimmed; blank lines are ignored and lines starting with `#` are
/// counted as comments.
/// Input order is preserved within each set, and duplicates are kept.
pub fn classify_urls(text: &str, policy: &DomainPolicy) -> IntakeReport {
    let mut report = IntakeReport::default();

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }
        if line.starts_with('#') {
            debug!("Skipping comment line: {}", line);
            report.comments += 1;
            continue;
        }
        match TargetUrl::parse(line) {
            Ok(target) => match policy.evaluate(target.url()) {
                PolicyDecision::Allowed => report.accepted.push(target),
                decision => report.blocked.push(Rejected {
                    line: line.to_string(),
                    reason: decision,
                }),
            },
            Err(reason) => report.invalid.push(Rejected {
                line: line.to_string(),
                reason,
            }),
        }
    }

    report
}

/// Reads the URL list file.
pub async fn read_url_list(path: &Path) -> Result<String, IntakeError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| IntakeError::Read {
            path: path.to_path_buf(),
            source,
        })
}
