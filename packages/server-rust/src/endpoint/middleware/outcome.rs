//! Outcome instrumentation for endpoints.
//!
//! Opens a span per call and classifies the result as `ok`, `failed` (the
//! envelope carries a service error) or `error` (the endpoint itself failed).
//! Also feeds the `endpoint_requests_total` counter.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use tower::{Layer, Service};
use tracing::{info_span, Instrument};

use crate::endpoint::request::{EndpointError, Failer, Invocation};

pub const ENDPOINT_REQUESTS_TOTAL: &str = "endpoint_requests_total";

/// Classifies an endpoint result.
pub fn outcome_of<T: Failer>(result: &Result<T, EndpointError>) -> &'static str {
    match result {
        Ok(resp) if resp.failed().is_some() => "failed",
        Ok(_) => "ok",
        Err(_) => "error",
    }
}

// ---------------------------------------------------------------------------
// OutcomeLayer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct OutcomeLayer {
    endpoint: &'static str,
}

impl OutcomeLayer {
    #[must_use]
    pub fn new(endpoint: &'static str) -> Self {
        Self { endpoint }
    }
}

impl<S> Layer<S> for OutcomeLayer {
    type Service = OutcomeService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        OutcomeService {
            inner,
            endpoint: self.endpoint,
        }
    }
}

// ---------------------------------------------------------------------------
// OutcomeService
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct OutcomeService<S> {
    inner: S,
    endpoint: &'static str,
}

impl<S, R> Service<Invocation<R>> for OutcomeService<S>
where
    S: Service<Invocation<R>, Error = EndpointError> + Send,
    S::Future: Send + 'static,
    S::Response: Failer + Send + 'static,
{
    type Response = S::Response;
    type Error = EndpointError;
    type Future = Pin<Box<dyn Future<Output = Result<S::Response, EndpointError>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, inv: Invocation<R>) -> Self::Future {
        let endpoint = self.endpoint;
        let call_id = inv.ctx.call_id;

        let span = info_span!(
            "endpoint",
            endpoint = endpoint,
            call_id = call_id,
            trace_id = %inv.ctx.trace_id,
            duration_ms = tracing::field::Empty,
            outcome = tracing::field::Empty,
        );

        let fut = self.inner.call(inv);

        Box::pin(
            async move {
                let start = Instant::now();
                let result = fut.await;
                let outcome = outcome_of(&result);

                #[allow(clippy::cast_possible_truncation)]
                let duration_ms = start.elapsed().as_millis() as u64;
                let span = tracing::Span::current();
                span.record("duration_ms", duration_ms);
                span.record("outcome", outcome);

                metrics::counter!(ENDPOINT_REQUESTS_TOTAL, "endpoint" => endpoint, "outcome" => outcome)
                    .increment(1);
                tracing::debug!(
                    endpoint = endpoint,
                    call_id = call_id,
                    duration_ms = duration_ms,
                    outcome = outcome,
                    "endpoint call complete"
                );

                result
            }
            .instrument(span),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use tower::ServiceExt;
    use workout_core::{MovementId, RequestContext};

    use super::*;
    use crate::endpoint::request::{DeleteMovementRequest, DeleteMovementResponse};
    use crate::endpoint::set::make_delete_endpoint;
    use crate::service::MovementError;
    use crate::test_support::ScriptedService;

    #[test]
    fn classifies_results() {
        let ok: Result<DeleteMovementResponse, EndpointError> = Ok(DeleteMovementResponse::ok(()));
        let failed: Result<DeleteMovementResponse, EndpointError> =
            Ok(DeleteMovementResponse::failure(MovementError::Cancelled));
        let error: Result<DeleteMovementResponse, EndpointError> = Err(EndpointError::Overloaded);

        assert_eq!(outcome_of(&ok), "ok");
        assert_eq!(outcome_of(&failed), "failed");
        assert_eq!(outcome_of(&error), "error");
    }

    #[tokio::test]
    async fn passes_response_through() {
        let err = MovementError::Persistence("db down".to_string());
        let svc = OutcomeLayer::new("DeleteMovement")
            .layer(make_delete_endpoint(ScriptedService::failing(&err).into_arc()));

        let inv = Invocation::new(
            RequestContext::new(5, "trace-5"),
            DeleteMovementRequest {
                id: MovementId::new("m-1"),
            },
        );
        let resp = svc.oneshot(inv).await.unwrap();
        assert_eq!(resp.failed(), Some(&err));
    }
}
