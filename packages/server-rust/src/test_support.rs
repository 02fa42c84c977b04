//! Shared fixtures for unit tests across the service, endpoint, and transport layers.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use workout_core::{Movement, MovementId, NewMovement, RequestContext};

use crate::endpoint::MovementSet;
use crate::service::{MovementError, MovementService};
use crate::traits::MovementStore;
use crate::transport::MovementTransport;

/// Runs a future to completion on a fresh current-thread runtime.
///
/// For use inside `proptest!` bodies, which are synchronous.
pub fn block_on<F: Future>(fut: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("test runtime")
        .block_on(fut)
}

pub fn movement(id: &str, name: &str, category: &str) -> Movement {
    NewMovement::new("tenant-1", name, category)
        .expect("valid movement")
        .with_id(MovementId::new(id))
}

/// Store whose every call fails, simulating an unreachable database.
pub struct FailingStore;

#[async_trait]
impl MovementStore for FailingStore {
    async fn store(&self, _movement: NewMovement) -> anyhow::Result<MovementId> {
        anyhow::bail!("store unavailable")
    }

    async fn fetch(&self, _id: &MovementId) -> anyhow::Result<Option<Movement>> {
        anyhow::bail!("store unavailable")
    }

    async fn query(&self, _category: Option<&str>) -> anyhow::Result<Vec<Movement>> {
        anyhow::bail!("store unavailable")
    }

    async fn remove(&self, _id: &MovementId) -> anyhow::Result<()> {
        anyhow::bail!("store unavailable")
    }
}

/// Store that accepts writes but hands back an empty identifier.
pub struct EmptyIdStore;

#[async_trait]
impl MovementStore for EmptyIdStore {
    async fn store(&self, _movement: NewMovement) -> anyhow::Result<MovementId> {
        Ok(MovementId::default())
    }

    async fn fetch(&self, _id: &MovementId) -> anyhow::Result<Option<Movement>> {
        Ok(None)
    }

    async fn query(&self, _category: Option<&str>) -> anyhow::Result<Vec<Movement>> {
        Ok(Vec::new())
    }

    async fn remove(&self, _id: &MovementId) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Service returning fixed outcomes and counting calls.
///
/// `delay` holds every call for the given duration before answering, which
/// lets middleware tests exercise timeouts and concurrency limits.
pub struct ScriptedService {
    pub create: Result<Movement, MovementError>,
    pub get: Result<Movement, MovementError>,
    pub list: Result<Vec<Movement>, MovementError>,
    pub delete: Result<(), MovementError>,
    pub delay: Duration,
    pub calls: AtomicUsize,
}

impl ScriptedService {
    pub fn succeeding() -> Self {
        let squat = movement("m-1", "squat", "legs");
        Self {
            create: Ok(squat.clone()),
            get: Ok(squat.clone()),
            list: Ok(vec![squat, movement("m-2", "curl", "arms")]),
            delete: Ok(()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: &MovementError) -> Self {
        Self {
            create: Err(err.clone()),
            get: Err(err.clone()),
            list: Err(err.clone()),
            delete: Err(err.clone()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn into_arc(self) -> Arc<dyn MovementService> {
        Arc::new(self)
    }

    async fn hold(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl MovementService for ScriptedService {
    async fn create(
        &self,
        _ctx: &RequestContext,
        _tenant_id: &str,
        _name: &str,
        _category_id: &str,
    ) -> Result<Movement, MovementError> {
        self.hold().await;
        self.create.clone()
    }

    async fn get(&self, _ctx: &RequestContext, _id: &MovementId) -> Result<Movement, MovementError> {
        self.hold().await;
        self.get.clone()
    }

    async fn list(
        &self,
        _ctx: &RequestContext,
        _category_name: &str,
    ) -> Result<Vec<Movement>, MovementError> {
        self.hold().await;
        self.list.clone()
    }

    async fn delete(&self, _ctx: &RequestContext, _id: &MovementId) -> Result<(), MovementError> {
        self.hold().await;
        self.delete.clone()
    }
}

/// Transport over bare endpoints around a succeeding `ScriptedService`.
pub fn scripted_transport() -> MovementTransport {
    MovementTransport::new(MovementSet::without_middleware(
        ScriptedService::succeeding().into_arc(),
    ))
}
