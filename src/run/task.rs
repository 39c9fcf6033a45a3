//! The page loop.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::intake::TargetUrl;
use crate::processor::{process_page, PageContext, ProcessingOutcome};
use crate::scheduler::{run_scheduled, SchedulerSettings};

/// Audits every target under the scheduler's limits.
///
/// Returns one outcome per target. `completed_urls` is bumped as each page
/// finishes so the progress logger can report on it, including pages whose
/// task panicked or was cancelled outside the page processor.
pub async fn audit_pages(
    ctx: Arc<PageContext>,
    targets: Vec<TargetUrl>,
    settings: &SchedulerSettings,
    completed_urls: Arc<AtomicUsize>,
) -> Vec<ProcessingOutcome> {
    let stats = Arc::clone(&ctx.stats);
    let lost_completed = Arc::clone(&completed_urls);
    run_scheduled(
        targets,
        settings,
        move |url, dispatch| {
            let ctx = Arc::clone(&ctx);
            let completed_urls = Arc::clone(&completed_urls);
            async move {
                let outcome = process_page(&ctx, url, dispatch).await;
                completed_urls.fetch_add(1, Ordering::SeqCst);
                outcome
            }
        },
        move |_, error| {
            stats.increment_error(error.error_type());
            lost_completed.fetch_add(1, Ordering::SeqCst);
        },
    )
    .await
}
