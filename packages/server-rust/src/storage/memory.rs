//! In-memory [`MovementStore`] implementation backed by [`DashMap`].
//!
//! Provides concurrent read/write access without external locking. Suitable
//! for development, tests, and single-node deployments where losing data on
//! restart is acceptable.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;
use workout_core::{Movement, MovementId, NewMovement};

use crate::traits::MovementStore;

/// A stored movement plus the sequence number it was inserted with.
#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    movement: Movement,
}

/// In-memory movement storage backed by [`DashMap`].
///
/// Identifiers are random UUID v4 strings. Each insert takes the next value of
/// an atomic sequence so `query` can return movements in insertion order
/// regardless of shard iteration order.
#[derive(Debug, Default)]
pub struct InMemoryMovementStore {
    entries: DashMap<MovementId, Entry>,
    next_seq: AtomicU64,
}

impl InMemoryMovementStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl MovementStore for InMemoryMovementStore {
    async fn store(&self, movement: NewMovement) -> anyhow::Result<MovementId> {
        let id = MovementId::new(Uuid::new_v4().to_string());
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(
            id.clone(),
            Entry {
                seq,
                movement: movement.with_id(id.clone()),
            },
        );
        Ok(id)
    }

    async fn fetch(&self, id: &MovementId) -> anyhow::Result<Option<Movement>> {
        Ok(self.entries.get(id).map(|entry| entry.movement.clone()))
    }

    async fn query(&self, category: Option<&str>) -> anyhow::Result<Vec<Movement>> {
        let mut matches: Vec<Entry> = self
            .entries
            .iter()
            .filter(|entry| category.map_or(true, |c| entry.movement.in_category(c)))
            .map(|entry| entry.value().clone())
            .collect();
        matches.sort_by_key(|entry| entry.seq);
        Ok(matches.into_iter().map(|entry| entry.movement).collect())
    }

    async fn remove(&self, id: &MovementId) -> anyhow::Result<()> {
        self.entries.remove(id);
        Ok(())
    }
}
