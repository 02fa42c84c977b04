use async_trait::async_trait;
use workout_core::{Movement, MovementId, NewMovement};

/// Pluggable persistence backend for movements.
/// Implementations: memory (shipped), `PostgreSQL`/`CockroachDB` (future).
///
/// The movement service is the only caller. Implementations own their
/// concurrency control; the service holds no locks around these calls.
#[async_trait]
pub trait MovementStore: Send + Sync {
    /// Persist a new movement and return the identifier assigned to it.
    async fn store(&self, movement: NewMovement) -> anyhow::Result<MovementId>;

    /// Load a single movement by identifier.
    async fn fetch(&self, id: &MovementId) -> anyhow::Result<Option<Movement>>;

    /// Load all movements, keeping only those in `category` when given.
    /// Results come back in insertion order.
    async fn query(&self, category: Option<&str>) -> anyhow::Result<Vec<Movement>>;

    /// Remove a movement. Removing an unknown identifier is not an error.
    async fn remove(&self, id: &MovementId) -> anyhow::Result<()>;
}
