//! Decorator composition for `MovementService`.
//!
//! `MovementLayer` is the service-level counterpart of a Tower `Layer`: it
//! wraps an inner `MovementService` in a decorator that implements the same
//! contract. `MovementStack` applies layers in declaration order, so the first
//! layer added is the outermost.

use std::sync::Arc;

use super::movement::MovementService;

/// Wraps a movement service in a decorator.
///
/// Decorators depend only on the `MovementService` contract and must return
/// the inner result unchanged.
pub trait MovementLayer: Send + Sync {
    fn layer(&self, inner: Arc<dyn MovementService>) -> Arc<dyn MovementService>;
}

/// Ordered list of decorators applied around a base service.
#[derive(Default)]
pub struct MovementStack {
    layers: Vec<Box<dyn MovementLayer>>,
}

impl MovementStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a layer inside all previously added layers.
    #[must_use]
    pub fn layer(mut self, layer: impl MovementLayer + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Wraps `base` with every layer. An empty stack returns `base` as is.
    #[must_use]
    pub fn service(self, base: Arc<dyn MovementService>) -> Arc<dyn MovementService> {
        self.layers
            .iter()
            .rev()
            .fold(base, |inner, layer| layer.layer(inner))
    }
}
