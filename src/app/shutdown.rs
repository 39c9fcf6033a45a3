//! Graceful shutdown handling.

use tokio_util::sync::CancellationToken;

use crate::browser::PageProvider;
use crate::report::CsvReport;

/// Shuts down all background work.
///
/// Stops the progress logger, flushes the CSV log and closes the browser.
/// Runs on every exit path; each step tolerates having already run.
pub async fn shutdown_gracefully(
    cancel: CancellationToken,
    logging_task: Option<tokio::task::JoinHandle<()>>,
    csv: Option<&CsvReport>,
    provider: &dyn PageProvider,
) {
    // Signal logging task to stop and await it
    cancel.cancel();
    if let Some(logging_task) = logging_task {
        let _ = logging_task.await;
    }

    if let Some(csv) = csv {
        if let Err(e) = csv.finish().await {
            log::warn!("{:#}", e);
        }
    }

    provider.shutdown().await;
}
