//! Per-hostname dispatch gates.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;

/// Concurrency limiter and dispatch clock for one hostname.
#[derive(Debug)]
pub struct DomainGate {
    slots: Arc<Semaphore>,
    last_dispatch: Mutex<Option<Instant>>,
}

/// Permits held while a page task runs.
///
/// Dropping it releases both the domain slot and the global slot.
#[derive(Debug)]
pub struct DispatchPermit {
    _domain: OwnedSemaphorePermit,
    _global: OwnedSemaphorePermit,
    pub dispatched_at: Instant,
}

impl DomainGate {
    pub fn new(per_domain_limit: usize) -> Self {
        DomainGate {
            slots: Arc::new(Semaphore::new(per_domain_limit.max(1))),
            last_dispatch: Mutex::new(None),
        }
    }

    /// Waits until a URL on this host may start.
    ///
    /// Order: domain slot, then the host clock (sleeping out the remaining
    /// delay), then the global slot while still holding the clock. The
    /// dispatch time is recorded before the clock is released, so two
    /// dispatches to one host are always at least `delay` apart and a
    /// sleeping task never holds global capacity.
    ///
    /// Returns `None` if a semaphore was closed.
    pub async fn acquire(&self, global: &Arc<Semaphore>, delay: Duration) -> Option<DispatchPermit> {
        let domain = Arc::clone(&self.slots).acquire_owned().await.ok()?;

        let mut last = self.last_dispatch.lock().await;
        if let Some(previous) = *last {
            tokio::time::sleep_until(previous + delay).await;
        }
        let global = Arc::clone(global).acquire_owned().await.ok()?;
        let dispatched_at = Instant::now();
        *last = Some(dispatched_at);
        drop(last);

        Some(DispatchPermit {
            _domain: domain,
            _global: global,
            dispatched_at,
        })
    }
}

/// One gate per distinct host key, created the first time a host is seen.
#[derive(Debug, Default)]
pub struct GateMap {
    gates: HashMap<String, Arc<DomainGate>>,
}

impl GateMap {
    pub fn gate_for(&mut self, host: &str, per_domain_limit: usize) -> Arc<DomainGate> {
        Arc::clone(
            self.gates
                .entry(host.to_string())
                .or_insert_with(|| Arc::new(DomainGate::new(per_domain_limit))),
        )
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_gate_enforces_delay() {
        let gate = DomainGate::new(1);
        let global = Arc::new(Semaphore::new(4));
        let delay = Duration::from_millis(80);

        let first = gate.acquire(&global, delay).await.unwrap();
        let first_at = first.dispatched_at;
        drop(first);
        let second = gate.acquire(&global, delay).await.unwrap();
        assert!(second.dispatched_at - first_at >= delay);
    }

    #[tokio::test]
    async fn test_gate_releases_global_slot_on_drop() {
        let gate = DomainGate::new(2);
        let global = Arc::new(Semaphore::new(1));

        let permit = gate.acquire(&global, Duration::ZERO).await.unwrap();
        assert_eq!(global.available_permits(), 0);
        drop(permit);
        assert_eq!(global.available_permits(), 1);
    }

    #[test]
    fn test_gate_map_reuses_gates() {
        let mut map = GateMap::default();
        let a = map.gate_for("example.com", 1);
        let b = map.gate_for("example.com", 1);
        map.gate_for("example.org", 1);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(map.len(), 2);
    }
}
