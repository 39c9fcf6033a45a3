//! Progress logging utilities.

use log::info;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Logs progress information about page processing.
///
/// # Arguments
///
/// * `start_time` - The start time of processing
/// * `completed_urls` - Atomic counter of pages finished (success or failure)
/// * `total_urls` - Number of accepted URLs in the batch
pub fn log_progress(
    start_time: std::time::Instant,
    completed_urls: &Arc<AtomicUsize>,
    total_urls: usize,
) {
    let elapsed = start_time.elapsed();
    let completed = completed_urls.load(Ordering::SeqCst);
    let elapsed_secs = elapsed.as_secs_f64();
    let rate = if elapsed_secs > 0.0 {
        completed as f64 * 60.0 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Audited {}/{} pages in {:.1} seconds (~{:.1} pages/min)",
        completed, total_urls, elapsed_secs, rate
    );
}

/// Spawns a task that calls [`log_progress`] every `interval` until `cancel`
/// fires.
pub fn spawn_progress_logger(
    cancel: CancellationToken,
    completed_urls: Arc<AtomicUsize>,
    total_urls: usize,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    let start_time = std::time::Instant::now();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => log_progress(start_time, &completed_urls, total_urls),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_progress_with_no_elapsed_time() {
        let completed = Arc::new(AtomicUsize::new(0));
        // Should not panic or divide by zero
        log_progress(std::time::Instant::now(), &completed, 3);
    }

    #[tokio::test]
    async fn test_progress_logger_stops_on_cancel() {
        let cancel = CancellationToken::new();
        let handle = spawn_progress_logger(
            cancel.clone(),
            Arc::new(AtomicUsize::new(1)),
            2,
            Duration::from_millis(10),
        );
        tokio::time::sleep(Duration::from_millis(30)).await;
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("logger did not stop")
            .unwrap();
    }
}
