//! Movement business logic and its decorator chain.
//!
//! This module implements the service side of the request pipeline:
//!
//! 1. **Contract** (`movement`): the `MovementService` trait and the
//!    storage-backed `BasicMovementService`
//! 2. **Decorators** (`logging`, `metrics`): wrappers implementing the same
//!    contract around an inner service
//! 3. **Composition** (`layer`): `MovementLayer` + `MovementStack` for stacking
//!    decorators in an explicit order at startup

pub mod config;
pub mod error;
pub mod layer;
pub mod logging;
pub mod metrics;
pub mod movement;

use std::sync::Arc;

use crate::traits::MovementStore;

// Re-export key types for convenient access.
pub use config::ServerConfig;
pub use error::MovementError;
pub use layer::{MovementLayer, MovementStack};
pub use logging::{LoggingLayer, LoggingMovementService};
pub use metrics::{MetricsLayer, MetricsMovementService};
pub use movement::{BasicMovementService, MovementService};

/// Builds the production movement service: the storage-backed base wrapped
/// in metrics and then logging.
#[must_use]
pub fn new_movement_service(store: Arc<dyn MovementStore>) -> Arc<dyn MovementService> {
    MovementStack::new()
        .layer(LoggingLayer)
        .layer(MetricsLayer)
        .service(Arc::new(BasicMovementService::new(store)))
}
