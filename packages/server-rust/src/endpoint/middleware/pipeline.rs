//! Pipeline composition: wraps one endpoint in the shared middleware stack.

use tower::util::BoxCloneSyncService;
use tower::ServiceBuilder;

use super::load_shed::LoadShedLayer;
use super::outcome::OutcomeLayer;
use super::timeout::TimeoutLayer;
use crate::endpoint::request::{Endpoint, Failer};

/// Wraps `endpoint` with the endpoint middleware.
///
/// Layer order (outermost to innermost):
/// 1. `LoadShedLayer` -- reject when overloaded (fail fast before doing any work)
/// 2. `TimeoutLayer` -- enforce the invocation deadline
/// 3. `OutcomeLayer` -- record timing and outcome (closest to the endpoint)
///
/// Pass the same `LoadShedLayer` for every endpoint of a set so they share
/// one concurrency budget.
#[must_use]
pub fn build_endpoint_pipeline<Req, Resp>(
    name: &'static str,
    endpoint: Endpoint<Req, Resp>,
    load_shed: &LoadShedLayer,
    timeout: TimeoutLayer,
) -> Endpoint<Req, Resp>
where
    Req: Send + 'static,
    Resp: Failer + Send + 'static,
{
    BoxCloneSyncService::new(
        ServiceBuilder::new()
            .layer(load_shed.clone())
            .layer(timeout)
            .layer(OutcomeLayer::new(name))
            .service(endpoint),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
