//! Axum handlers and the state they share.

pub mod health;
pub mod rpc;

pub use health::{health_handler, liveness_handler, readiness_handler};
pub use rpc::{
    create_movement_handler, delete_movement_handler, get_movement_handler,
    list_movements_handler, TransportError,
};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use super::ShutdownController;
use crate::transport::MovementTransport;

/// State shared by every handler through axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub shutdown: Arc<ShutdownController>,
    pub transport: Arc<MovementTransport>,
    call_ids: Arc<AtomicU64>,
    pub start_time: Instant,
}

impl AppState {
    #[must_use]
    pub fn new(shutdown: Arc<ShutdownController>, transport: Arc<MovementTransport>) -> Self {
        Self {
            shutdown,
            transport,
            call_ids: Arc::new(AtomicU64::new(1)),
            start_time: Instant::now(),
        }
    }

    /// Call ids are unique per process and start at 1.
    #[must_use]
    pub fn next_call_id(&self) -> u64 {
        self.call_ids.fetch_add(1, Ordering::Relaxed)
    }
}
