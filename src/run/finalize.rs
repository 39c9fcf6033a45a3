//! Audit finalization and cleanup.

use std::sync::Arc;

use crate::aggregate::BatchSummary;
use crate::app::{log_progress, print_final_summary, shutdown_gracefully};
use crate::error_handling::AuditError;
use crate::processor::ProcessingOutcome;

use super::resources::{AuditLoopResult, AuditReport, AuditResources};

/// Shuts everything down and turns the outcomes into the final report.
///
/// Shutdown runs first and on every path, so the browser is closed and the
/// CSV log flushed even when the loop was interrupted.
///
/// # Errors
///
/// Passes through the loop's error, and returns `AuditError::Internal` if
/// the number of outcomes does not match the number of accepted URLs.
pub async fn finalize_audit(
    resources: AuditResources,
    loop_result: AuditLoopResult,
    outcomes: Result<Vec<ProcessingOutcome>, AuditError>,
) -> Result<AuditReport, AuditError> {
    let AuditLoopResult {
        cancel,
        logging_task,
    } = loop_result;
    let ctx = &resources.ctx;

    shutdown_gracefully(cancel, logging_task, ctx.csv.as_ref(), ctx.provider.as_ref()).await;

    log_progress(
        resources.start_time,
        &resources.completed_urls,
        resources.total_urls,
    );

    let outcomes = outcomes?;
    if outcomes.len() != resources.total_urls {
        return Err(AuditError::Internal(format!(
            "{} outcomes for {} accepted URLs",
            outcomes.len(),
            resources.total_urls
        )));
    }

    let elapsed_seconds = resources.start_time.elapsed().as_secs_f64();
    let summary = BatchSummary::from_outcomes(&outcomes);
    print_final_summary(
        &summary,
        &ctx.stats,
        elapsed_seconds,
        &resources.run_directory,
    );

    Ok(AuditReport {
        summary,
        stats: Arc::clone(&ctx.stats),
        run_directory: resources.run_directory,
        elapsed_seconds,
    })
}
