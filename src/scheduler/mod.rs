//! Domain-aware scheduling.
//!
//! Every accepted URL becomes one spawned task. A task starts only while it
//! holds a slot on its hostname's gate and a slot on the global gate, and only
//! once the hostname's minimum delay since the previous dispatch has passed.
//! Outcomes are collected in completion order.

mod gate;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use log::{error, info};
use tokio::sync::Semaphore;
use tokio::task::{AbortHandle, JoinError};
use tokio::time::Instant;

use crate::config::Config;
use crate::error_handling::PageError;
use crate::intake::TargetUrl;
use crate::processor::ProcessingOutcome;
use crate::utils::panic_message;

pub use gate::{DispatchPermit, DomainGate, GateMap};

/// Scheduling limits resolved from the configuration.
#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    /// Maximum tasks in flight across all hosts
    pub global_limit: usize,
    /// Maximum tasks in flight per hostname
    pub per_domain_limit: usize,
    /// Minimum time between two dispatches to one hostname
    pub domain_delay: Duration,
    /// `false` processes strictly one URL at a time, in input order
    pub concurrent: bool,
}

impl SchedulerSettings {
    pub fn from_config(config: &Config) -> Self {
        SchedulerSettings {
            global_limit: config.concurrency,
            per_domain_limit: config.per_domain_concurrency,
            domain_delay: config.domain_delay(),
            concurrent: config.enable_concurrency,
        }
    }
}

/// What a page task is told when it is dispatched.
#[derive(Debug, Clone)]
pub struct Dispatch {
    /// 1-based position in the input
    pub index: usize,
    pub total: usize,
    pub host: String,
    /// When the task passed both gates; the host clock records this instant
    pub dispatched_at: Instant,
}

struct AbortOnDrop(Vec<AbortHandle>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

/// Runs `process` once for every URL under the configured limits.
///
/// Returns exactly one outcome per URL. A task that panics or is cancelled
/// before `process` returns yields a failure outcome for its URL, and
/// `on_lost` is called with that URL and error. Dropping the returned future
/// aborts every task still running.
pub async fn run_scheduled<F, Fut, L>(
    urls: Vec<TargetUrl>,
    settings: &SchedulerSettings,
    process: F,
    mut on_lost: L,
) -> Vec<ProcessingOutcome>
where
    F: Fn(TargetUrl, Dispatch) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ProcessingOutcome> + Send + 'static,
    L: FnMut(&str, &PageError),
{
    let total = urls.len();
    let sequential = !settings.concurrent || total <= 1;
    let (global_limit, per_domain_limit) = if sequential {
        (1, 1)
    } else {
        (settings.global_limit.max(1), settings.per_domain_limit.max(1))
    };

    let process = Arc::new(process);
    let global = Arc::new(Semaphore::new(global_limit));
    let mut gates = GateMap::default();
    let mut outcomes = Vec::with_capacity(total);

    if sequential {
        info!(
            "Processing {} URL{} sequentially",
            total,
            if total == 1 { "" } else { "s" }
        );
        for (i, url) in urls.into_iter().enumerate() {
            let host = url.host_key();
            let gate = gates.gate_for(&host, per_domain_limit);
            let url_string = url.as_str().to_string();
            let handle = tokio::spawn(dispatch_one(
                url,
                i + 1,
                total,
                host,
                gate,
                Arc::clone(&global),
                settings.domain_delay,
                Arc::clone(&process),
            ));
            let _guard = AbortOnDrop(vec![handle.abort_handle()]);
            outcomes.push(collect(url_string, handle.await, &mut on_lost));
        }
        return outcomes;
    }

    let mut guard = AbortOnDrop(Vec::with_capacity(total));
    let mut tasks = FuturesUnordered::new();

    for (i, url) in urls.into_iter().enumerate() {
        let host = url.host_key();
        let gate = gates.gate_for(&host, per_domain_limit);
        let url_string = url.as_str().to_string();
        let handle = tokio::spawn(dispatch_one(
            url,
            i + 1,
            total,
            host,
            gate,
            Arc::clone(&global),
            settings.domain_delay,
            Arc::clone(&process),
        ));
        guard.0.push(handle.abort_handle());
        tasks.push(async move { (url_string, handle.await) });
    }

    info!(
        "Processing {} URLs across {} host{} (concurrency {}, per host {}, delay {}ms)",
        total,
        gates.len(),
        if gates.len() == 1 { "" } else { "s" },
        global_limit,
        per_domain_limit,
        settings.domain_delay.as_millis()
    );

    while let Some((url, joined)) = tasks.next().await {
        outcomes.push(collect(url, joined, &mut on_lost));
    }
    drop(guard);

    outcomes
}

#[allow(clippy::too_many_arguments)]
async fn dispatch_one<F, Fut>(
    url: TargetUrl,
    index: usize,
    total: usize,
    host: String,
    gate: Arc<DomainGate>,
    global: Arc<Semaphore>,
    delay: Duration,
    process: Arc<F>,
) -> Result<ProcessingOutcome, PageError>
where
    F: Fn(TargetUrl, Dispatch) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ProcessingOutcome> + Send + 'static,
{
    let Some(permit) = gate.acquire(&global, delay).await else {
        return Err(PageError::Cancelled("scheduler gate closed".to_string()));
    };
    let dispatch = Dispatch {
        index,
        total,
        host,
        dispatched_at: permit.dispatched_at,
    };
    let outcome = (*process)(url, dispatch).await;
    drop(permit);
    Ok(outcome)
}

fn collect<L>(
    url: String,
    joined: Result<Result<ProcessingOutcome, PageError>, JoinError>,
    on_lost: &mut L,
) -> ProcessingOutcome
where
    L: FnMut(&str, &PageError),
{
    let error = match joined {
        Ok(Ok(outcome)) => return outcome,
        Ok(Err(e)) => e,
        Err(e) if e.is_panic() => {
            let message = panic_message(&*e.into_panic());
            error!("Task for {} panicked: {}", url, message);
            PageError::Panic(message)
        }
        Err(e) => PageError::Cancelled(e.to_string()),
    };
    on_lost(&url, &error);
    ProcessingOutcome::failure(url, &error)
}
