//! Audit run resources and state.
//!
//! Holds everything initialized for one batch, split into what is loaded
//! before the browser starts and what is assembled around it.

use std::path::PathBuf;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::aggregate::BatchSummary;
use crate::error_handling::ProcessingStats;
use crate::initialization::RunResources;
use crate::intake::TargetUrl;
use crate::processor::{PageContext, RunDirectory};
use crate::report::CsvReport;
use crate::scheduler::SchedulerSettings;

/// Results of a completed audit run.
#[derive(Debug, Clone)]
pub struct AuditReport {
    /// Per-URL tally
    pub summary: BatchSummary,
    /// Error, warning and info counters of the run
    pub stats: Arc<ProcessingStats>,
    /// `<output>/<timestamp>/` directory holding every artifact of the run
    pub run_directory: PathBuf,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

/// Inputs loaded from disk before the browser is launched.
pub struct AuditAssets {
    pub resources: RunResources,
    pub run_dir: RunDirectory,
    pub csv: Option<CsvReport>,
}

/// All resources of a running batch.
pub struct AuditResources {
    /// Shared by every page task
    pub ctx: Arc<PageContext>,
    pub targets: Vec<TargetUrl>,
    pub scheduler: SchedulerSettings,
    /// Pages finished, successful or not
    pub completed_urls: Arc<AtomicUsize>,
    pub total_urls: usize,
    pub run_directory: PathBuf,
    pub start_time: Instant,
}

/// Background work started for the page loop.
pub struct AuditLoopResult {
    /// Stops the progress logger
    pub cancel: CancellationToken,
    pub logging_task: Option<tokio::task::JoinHandle<()>>,
}
