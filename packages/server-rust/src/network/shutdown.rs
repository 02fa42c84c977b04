//! Health state and in-flight accounting for graceful shutdown.
//!
//! The state lives in an `ArcSwap` so probes never block. Every admitted RPC
//! holds a [`RequestGuard`]; the last guard to drop wakes whoever is waiting
//! in [`ShutdownController::wait_for_drain`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use serde::Serialize;
use tokio::sync::Notify;

/// `Starting -> Ready -> Draining -> Stopped`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Starting,
    Ready,
    /// Shutdown was requested; admitted RPCs are finishing.
    Draining,
    /// Every admitted RPC has finished.
    Stopped,
}

impl HealthState {
    /// RPCs are admitted before the first `set_ready()` as well, so a
    /// request racing startup is served rather than refused.
    #[must_use]
    pub fn accepts_requests(self) -> bool {
        matches!(self, Self::Starting | Self::Ready)
    }
}

#[derive(Debug, Default)]
struct InFlight {
    count: AtomicU64,
    idle: Notify,
}

/// Owns the server's health state and counts admitted RPCs.
#[derive(Debug)]
pub struct ShutdownController {
    state: ArcSwap<HealthState>,
    drain_started: Notify,
    in_flight: Arc<InFlight>,
}

impl ShutdownController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ArcSwap::from_pointee(HealthState::Starting),
            drain_started: Notify::new(),
            in_flight: Arc::new(InFlight::default()),
        }
    }

    #[must_use]
    pub fn health_state(&self) -> HealthState {
        **self.state.load()
    }

    pub fn set_ready(&self) {
        self.state.store(Arc::new(HealthState::Ready));
    }

    /// Stops admitting RPCs. Idempotent, and never moves a stopped
    /// controller back to `Draining`.
    pub fn begin_drain(&self) {
        if self.health_state() != HealthState::Stopped {
            self.state.store(Arc::new(HealthState::Draining));
        }
        self.drain_started.notify_waiters();
    }

    #[must_use]
    pub fn is_draining(&self) -> bool {
        !self.health_state().accepts_requests()
    }

    /// Completes once `begin_drain()` has been called.
    pub async fn draining(&self) {
        loop {
            let started = self.drain_started.notified();
            if self.is_draining() {
                return;
            }
            started.await;
        }
    }

    /// Admits one RPC unless the server is draining.
    ///
    /// The count goes up before the state is read, so an RPC admitted here
    /// is always seen by a concurrent `wait_for_drain()`.
    #[must_use]
    pub fn admit(&self) -> Option<RequestGuard> {
        let guard = self.track();
        self.health_state().accepts_requests().then_some(guard)
    }

    /// Counts one RPC regardless of state, until the guard drops.
    #[must_use]
    pub fn track(&self) -> RequestGuard {
        self.in_flight.count.fetch_add(1, Ordering::SeqCst);
        RequestGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    #[must_use]
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.count.load(Ordering::SeqCst)
    }

    /// Waits up to `timeout` for the in-flight count to reach zero.
    ///
    /// On success the state becomes `Stopped` and `true` is returned. On
    /// timeout the state is left as it was and `false` is returned.
    pub async fn wait_for_drain(&self, timeout: Duration) -> bool {
        let idle = async {
            loop {
                let notified = self.in_flight.idle.notified();
                if self.in_flight_count() == 0 {
                    return;
                }
                notified.await;
            }
        };

        if tokio::time::timeout(timeout, idle).await.is_err() {
            return false;
        }
        self.state.store(Arc::new(HealthState::Stopped));
        true
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

/// One admitted RPC. Dropping it, unwinding included, releases the slot.
#[derive(Debug)]
pub struct RequestGuard {
    in_flight: Arc<InFlight>,
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        if self.in_flight.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.in_flight.idle.notify_waiters();
        }
    }
}
