//! The movement service contract and its storage-backed implementation.

use std::sync::Arc;

use async_trait::async_trait;
use workout_core::{Movement, MovementId, NewMovement, RequestContext};

use super::error::MovementError;
use crate::traits::MovementStore;

// ---------------------------------------------------------------------------
// MovementService trait
// ---------------------------------------------------------------------------

/// Business-logic contract for movements.
///
/// Every method receives the caller's `RequestContext`. Implementations are
/// shared across concurrent requests and must not keep per-request state.
#[async_trait]
pub trait MovementService: Send + Sync {
    /// Validate and persist a new movement.
    async fn create(
        &self,
        ctx: &RequestContext,
        tenant_id: &str,
        name: &str,
        category_id: &str,
    ) -> Result<Movement, MovementError>;

    /// Fetch a movement by identifier.
    async fn get(&self, ctx: &RequestContext, id: &MovementId) -> Result<Movement, MovementError>;

    /// List movements. An empty `category_name` disables filtering.
    async fn list(
        &self,
        ctx: &RequestContext,
        category_name: &str,
    ) -> Result<Vec<Movement>, MovementError>;

    /// Remove a movement. Unknown identifiers are not an error.
    async fn delete(&self, ctx: &RequestContext, id: &MovementId) -> Result<(), MovementError>;
}

// ---------------------------------------------------------------------------
// BasicMovementService
// ---------------------------------------------------------------------------

/// Base implementation that validates input and delegates to a `MovementStore`.
///
/// The context is checked before every storage call so abandoned or expired
/// requests never reach storage.
pub struct BasicMovementService {
    store: Arc<dyn MovementStore>,
}

impl BasicMovementService {
    #[must_use]
    pub fn new(store: Arc<dyn MovementStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MovementService for BasicMovementService {
    async fn create(
        &self,
        ctx: &RequestContext,
        tenant_id: &str,
        name: &str,
        category_id: &str,
    ) -> Result<Movement, MovementError> {
        let draft = NewMovement::new(tenant_id, name, category_id)?;
        ctx.check()?;

        let id = self
            .store
            .store(draft.clone())
            .await
            .map_err(|e| MovementError::persistence(&e))?;
        if id.is_empty() {
            return Err(MovementError::Programming(
                "storage assigned an empty movement id".to_string(),
            ));
        }
        Ok(draft.with_id(id))
    }

    async fn get(&self, ctx: &RequestContext, id: &MovementId) -> Result<Movement, MovementError> {
        ctx.check()?;
        self.store
            .fetch(id)
            .await
            .map_err(|e| MovementError::persistence(&e))?
            .ok_or_else(|| MovementError::NotFound { id: id.clone() })
    }

    async fn list(
        &self,
        ctx: &RequestContext,
        category_name: &str,
    ) -> Result<Vec<Movement>, MovementError> {
        ctx.check()?;
        let filter = (!category_name.is_empty()).then_some(category_name);
        self.store
            .query(filter)
            .await
            .map_err(|e| MovementError::persistence(&e))
    }

    async fn delete(&self, ctx: &RequestContext, id: &MovementId) -> Result<(), MovementError> {
        ctx.check()?;
        self.store
            .remove(id)
            .await
            .map_err(|e| MovementError::persistence(&e))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::Duration;

    use proptest::prelude::*;
    use workout_core::{MovementField, ValidationError};

    use super::*;
    use crate::storage::InMemoryMovementStore;
    use crate::test_support::{block_on, EmptyIdStore, FailingStore};

    fn service() -> (BasicMovementService, Arc<InMemoryMovementStore>) {
        let store = Arc::new(InMemoryMovementStore::new());
        (BasicMovementService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn create_echoes_input_with_fresh_id() {
        let (svc, _store) = service();
        let ctx = RequestContext::default();
        let movement = svc.create(&ctx, "t1", "bench press", "c1").await.unwrap();
        assert!(!movement.id().is_empty());
        assert_eq!(movement.tenant_id(), "t1");
        assert_eq!(movement.name(), "bench press");
        assert_eq!(movement.category_id(), "c1");
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let (svc, _store) = service();
        let ctx = RequestContext::default();
        let created = svc.create(&ctx, "t1", "squat", "legs").await.unwrap();
        let fetched = svc.get(&ctx, created.id()).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn create_delete_get_scenario() {
        let (svc, _store) = service();
        let ctx = RequestContext::default();
        let created = svc.create(&ctx, "t1", "bench press", "c1").await.unwrap();

        svc.delete(&ctx, created.id()).await.unwrap();
        let err = svc.get(&ctx, created.id()).await.unwrap_err();
        assert_eq!(
            err,
            MovementError::NotFound {
                id: created.id().clone()
            }
        );
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (svc, _store) = service();
        let ctx = RequestContext::default();
        let created = svc.create(&ctx, "t1", "row", "back").await.unwrap();
        svc.delete(&ctx, created.id()).await.unwrap();
        svc.delete(&ctx, created.id()).await.unwrap();
        svc.delete(&ctx, &MovementId::new("never-existed")).await.unwrap();
    }

    #[tokio::test]
    async fn empty_fields_fail_validation_without_storing() {
        let (svc, store) = service();
        let ctx = RequestContext::default();
        for (tenant, name, category, field) in [
            ("", "n", "c", MovementField::TenantId),
            ("t", "", "c", MovementField::Name),
            ("t", "n", "", MovementField::CategoryId),
        ] {
            let err = svc.create(&ctx, tenant, name, category).await.unwrap_err();
            assert_eq!(
                err,
                MovementError::Validation(ValidationError::EmptyField { field })
            );
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn list_without_filter_returns_everything() {
        let (svc, _store) = service();
        let ctx = RequestContext::default();
        svc.create(&ctx, "t1", "squat", "legs").await.unwrap();
        svc.create(&ctx, "t1", "curl", "arms").await.unwrap();
        let all = svc.list(&ctx, "").await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn list_with_filter_returns_matching_category() {
        let (svc, _store) = service();
        let ctx = RequestContext::default();
        svc.create(&ctx, "t1", "squat", "legs").await.unwrap();
        svc.create(&ctx, "t1", "curl", "arms").await.unwrap();
        svc.create(&ctx, "t2", "lunge", "legs").await.unwrap();

        let legs = svc.list(&ctx, "legs").await.unwrap();
        let names: Vec<&str> = legs.iter().map(Movement::name).collect();
        assert_eq!(names, vec!["squat", "lunge"]);
    }

    #[tokio::test]
    async fn cancelled_context_skips_storage() {
        let (svc, store) = service();
        let ctx = RequestContext::default();
        ctx.cancel();

        let err = svc.create(&ctx, "t1", "squat", "legs").await.unwrap_err();
        assert_eq!(err, MovementError::Cancelled);
        assert!(store.is_empty());
        assert_eq!(svc.list(&ctx, "").await.unwrap_err(), MovementError::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_deadline_is_reported() {
        let (svc, _store) = service();
        let ctx = RequestContext::default().with_timeout(Duration::from_millis(10));
        tokio::time::advance(Duration::from_millis(20)).await;

        let err = svc
            .get(&ctx, &MovementId::new("m-1"))
            .await
            .unwrap_err();
        assert_eq!(err, MovementError::DeadlineExceeded);
    }

    #[tokio::test]
    async fn storage_failures_become_persistence_errors() {
        let svc = BasicMovementService::new(Arc::new(FailingStore));
        let ctx = RequestContext::default();

        let err = svc.create(&ctx, "t1", "squat", "legs").await.unwrap_err();
        assert!(matches!(err, MovementError::Persistence(ref msg) if msg.contains("store unavailable")));
        assert!(matches!(
            svc.get(&ctx, &MovementId::new("x")).await.unwrap_err(),
            MovementError::Persistence(_)
        ));
        assert!(matches!(
            svc.list(&ctx, "").await.unwrap_err(),
            MovementError::Persistence(_)
        ));
        assert!(matches!(
            svc.delete(&ctx, &MovementId::new("x")).await.unwrap_err(),
            MovementError::Persistence(_)
        ));
    }

    #[tokio::test]
    async fn empty_stored_id_is_a_programming_error() {
        let svc = BasicMovementService::new(Arc::new(EmptyIdStore));
        let err = svc
            .create(&RequestContext::default(), "t1", "squat", "legs")
            .await
            .unwrap_err();
        assert!(matches!(err, MovementError::Programming(ref msg) if msg.contains("empty movement id")));
        assert_eq!(err.kind(), "programming");
    }

    proptest! {
        #[test]
        fn created_ids_are_unique(names in proptest::collection::vec("[a-z]{1,10}", 1..20)) {
            let (svc, _store) = service();
            let ctx = RequestContext::default();
            let ids: HashSet<MovementId> = block_on(async {
                let mut ids = HashSet::new();
                for name in &names {
                    let movement = svc.create(&ctx, "tenant", name, "cat").await.unwrap();
                    ids.insert(movement.id().clone());
                }
                ids
            });
            prop_assert_eq!(ids.len(), names.len());
        }

        #[test]
        fn filtered_list_only_contains_category(
            categories in proptest::collection::vec(prop_oneof!["legs", "arms", "core"], 0..16),
            wanted in prop_oneof!["legs", "arms", "core"],
        ) {
            let (svc, _store) = service();
            let ctx = RequestContext::default();
            let listed = block_on(async {
                for (i, category) in categories.iter().enumerate() {
                    svc.create(&ctx, "tenant", &format!("m{i}"), category).await.unwrap();
                }
                svc.list(&ctx, &wanted).await.unwrap()
            });
            let expected = categories.iter().filter(|c| **c == wanted).count();
            prop_assert_eq!(listed.len(), expected);
            prop_assert!(listed.iter().all(|m| m.category_id() == wanted));
        }
    }
}
