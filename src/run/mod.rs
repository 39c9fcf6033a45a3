//! Audit run orchestration.
//!
//! `run_audit` is the library's main entry point: it prepares the batch,
//! launches headless Chromium, audits every accepted URL and shuts the
//! browser down again on every exit path.

mod finalize;
mod init;
mod resources;
mod task;

use std::sync::Arc;

use log::{info, warn};
use tokio_util::sync::CancellationToken;

use crate::app::spawn_progress_logger;
use crate::browser::{BrowserSettings, ChromiumSession, PageProvider};
use crate::config::{Config, LOGGING_INTERVAL};
use crate::error_handling::AuditError;
use crate::intake::TargetUrl;

pub use resources::AuditReport;
use resources::{AuditAssets, AuditLoopResult};

/// Runs an accessibility audit with the provided configuration.
///
/// Reads the URL list, audits every accepted URL in headless Chromium and
/// writes the reports under `<output_directory>/<timestamp>/`. SIGINT and
/// SIGTERM abandon in-flight pages, close the browser and return
/// `AuditError::Interrupted`.
///
/// # Errors
///
/// Returns an error for setup failures only: invalid configuration, an
/// unreadable URL list, no accepted URLs, missing resources, a browser that
/// fails to launch, or an interrupt. Failed pages are reported in the
/// returned summary instead.
///
/// # Example
///
/// ```no_run
/// use a11y_reporter::{run_audit, Config};
/// use std::path::PathBuf;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config {
///     url_list: PathBuf::from("urls.txt"),
///     ..Default::default()
/// };
/// let report = run_audit(config).await?;
/// println!("Audited {} URLs", report.summary.total);
/// # Ok(())
/// # }
/// ```
pub async fn run_audit(config: Config) -> Result<AuditReport, AuditError> {
    let targets = init::prepare_targets(&config).await?;
    let assets = init::load_assets(&config).await?;
    let session = ChromiumSession::launch(&BrowserSettings::from_config(&config)).await?;

    let interrupt = CancellationToken::new();
    let watchers = watch_shutdown_signals(interrupt.clone());
    let result = execute(&config, targets, assets, Arc::new(session), interrupt).await;
    for watcher in watchers {
        watcher.abort();
    }
    result
}

/// Runs an audit against an already running page provider.
///
/// Cancelling `interrupt` abandons the batch the same way a signal does. The
/// provider is shut down before this returns, whatever the result.
///
/// # Errors
///
/// Same as [`run_audit`], minus browser launch failures.
pub async fn run_audit_with(
    config: Config,
    provider: Arc<dyn PageProvider>,
    interrupt: CancellationToken,
) -> Result<AuditReport, AuditError> {
    let prepared = async {
        let targets = init::prepare_targets(&config).await?;
        let assets = init::load_assets(&config).await?;
        Ok::<_, AuditError>((targets, assets))
    }
    .await;

    match prepared {
        Ok((targets, assets)) => execute(&config, targets, assets, provider, interrupt).await,
        Err(e) => {
            provider.shutdown().await;
            Err(e)
        }
    }
}

async fn execute(
    config: &Config,
    targets: Vec<TargetUrl>,
    assets: AuditAssets,
    provider: Arc<dyn PageProvider>,
    interrupt: CancellationToken,
) -> Result<AuditReport, AuditError> {
    let mut resources = init::init_audit_resources(config, assets, provider, targets);

    let cancel = CancellationToken::new();
    let logging_task = Some(spawn_progress_logger(
        cancel.clone(),
        Arc::clone(&resources.completed_urls),
        resources.total_urls,
        LOGGING_INTERVAL,
    ));
    let loop_result = AuditLoopResult {
        cancel,
        logging_task,
    };

    info!("Auditing {} URLs", resources.total_urls);
    let targets = std::mem::take(&mut resources.targets);
    let outcomes = tokio::select! {
        outcomes = task::audit_pages(
            Arc::clone(&resources.ctx),
            targets,
            &resources.scheduler,
            Arc::clone(&resources.completed_urls),
        ) => Ok(outcomes),
        _ = interrupt.cancelled() => {
            warn!("Interrupted, abandoning in-flight pages");
            Err(AuditError::Interrupted)
        }
    };

    finalize::finalize_audit(resources, loop_result, outcomes).await
}

/// Cancels `interrupt` on Ctrl+C, and on SIGTERM where it exists.
fn watch_shutdown_signals(interrupt: CancellationToken) -> Vec<tokio::task::JoinHandle<()>> {
    let mut watchers = Vec::new();

    let on_ctrl_c = interrupt.clone();
    watchers.push(tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    }));

    #[cfg(unix)]
    {
        let on_term = interrupt;
        watchers.push(tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};
            if let Ok(mut sig) = signal(SignalKind::terminate()) {
                sig.recv().await;
                on_term.cancel();
            }
        }));
    }

    watchers
}
