//! Per-operation endpoints and the `MovementSet` that groups them.

use std::sync::Arc;

use tower::util::{service_fn, BoxCloneSyncService};

use super::middleware::{build_endpoint_pipeline, LoadShedLayer, TimeoutLayer};
use super::request::{
    CreateMovementRequest, CreateMovementResponse, DeleteMovementRequest, DeleteMovementResponse,
    Endpoint, EndpointError, Envelope, GetMovementRequest, GetMovementResponse, Invocation,
    ListMovementsRequest, ListMovementsResponse,
};
use crate::service::{MovementService, ServerConfig};

pub const CREATE_MOVEMENT: &str = "CreateMovement";
pub const GET_MOVEMENT: &str = "GetMovement";
pub const LIST_MOVEMENTS: &str = "ListMovements";
pub const DELETE_MOVEMENT: &str = "DeleteMovement";

// ---------------------------------------------------------------------------
// Endpoint constructors
// ---------------------------------------------------------------------------
//
// Each endpoint forwards the typed request to the service and wraps the
// result in its envelope. Service failures travel inside the envelope, so
// these never return `Err` themselves.

#[must_use]
pub fn make_create_endpoint(
    svc: Arc<dyn MovementService>,
) -> Endpoint<CreateMovementRequest, CreateMovementResponse> {
    BoxCloneSyncService::new(service_fn(move |inv: Invocation<CreateMovementRequest>| {
        let svc = Arc::clone(&svc);
        async move {
            let Invocation { ctx, request } = inv;
            let result = svc
                .create(&ctx, &request.tenant_id, &request.name, &request.category_id)
                .await;
            Ok::<_, EndpointError>(Envelope::from(result))
        }
    }))
}

#[must_use]
pub fn make_get_endpoint(
    svc: Arc<dyn MovementService>,
) -> Endpoint<GetMovementRequest, GetMovementResponse> {
    BoxCloneSyncService::new(service_fn(move |inv: Invocation<GetMovementRequest>| {
        let svc = Arc::clone(&svc);
        async move {
            let result = svc.get(&inv.ctx, &inv.request.id).await;
            Ok::<_, EndpointError>(Envelope::from(result))
        }
    }))
}

#[must_use]
pub fn make_list_endpoint(
    svc: Arc<dyn MovementService>,
) -> Endpoint<ListMovementsRequest, ListMovementsResponse> {
    BoxCloneSyncService::new(service_fn(move |inv: Invocation<ListMovementsRequest>| {
        let svc = Arc::clone(&svc);
        async move {
            let result = svc.list(&inv.ctx, &inv.request.category_name).await;
            Ok::<_, EndpointError>(Envelope::from(result))
        }
    }))
}

#[must_use]
pub fn make_delete_endpoint(
    svc: Arc<dyn MovementService>,
) -> Endpoint<DeleteMovementRequest, DeleteMovementResponse> {
    BoxCloneSyncService::new(service_fn(move |inv: Invocation<DeleteMovementRequest>| {
        let svc = Arc::clone(&svc);
        async move {
            let result = svc.delete(&inv.ctx, &inv.request.id).await;
            Ok::<_, EndpointError>(Envelope::from(result))
        }
    }))
}

// ---------------------------------------------------------------------------
// MovementSet
// ---------------------------------------------------------------------------

/// The four movement endpoints, ready to be bound by a transport.
#[derive(Clone)]
pub struct MovementSet {
    pub create: Endpoint<CreateMovementRequest, CreateMovementResponse>,
    pub get: Endpoint<GetMovementRequest, GetMovementResponse>,
    pub list: Endpoint<ListMovementsRequest, ListMovementsResponse>,
    pub delete: Endpoint<DeleteMovementRequest, DeleteMovementResponse>,
}

impl MovementSet {
    /// Builds every endpoint around `svc` and wraps each in the endpoint
    /// pipeline. All four share one load-shedding budget.
    #[must_use]
    pub fn new(svc: Arc<dyn MovementService>, config: &ServerConfig) -> Self {
        let load_shed = LoadShedLayer::new(config.max_concurrent_requests);
        let timeout = TimeoutLayer::new(config.default_request_timeout());

        Self {
            create: build_endpoint_pipeline(
                CREATE_MOVEMENT,
                make_create_endpoint(Arc::clone(&svc)),
                &load_shed,
                timeout,
            ),
            get: build_endpoint_pipeline(
                GET_MOVEMENT,
                make_get_endpoint(Arc::clone(&svc)),
                &load_shed,
                timeout,
            ),
            list: build_endpoint_pipeline(
                LIST_MOVEMENTS,
                make_list_endpoint(Arc::clone(&svc)),
                &load_shed,
                timeout,
            ),
            delete: build_endpoint_pipeline(
                DELETE_MOVEMENT,
                make_delete_endpoint(svc),
                &load_shed,
                timeout,
            ),
        }
    }

    /// Bare endpoints with no middleware.
    #[must_use]
    pub fn without_middleware(svc: Arc<dyn MovementService>) -> Self {
        Self {
            create: make_create_endpoint(Arc::clone(&svc)),
            get: make_get_endpoint(Arc::clone(&svc)),
            list: make_list_endpoint(Arc::clone(&svc)),
            delete: make_delete_endpoint(svc),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
