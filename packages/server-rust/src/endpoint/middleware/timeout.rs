//! Timeout middleware for endpoints.
//!
//! Runs each call under a child context whose deadline is the invocation's
//! own deadline, or `default_timeout` from now when the caller set none. On
//! expiry the child context is cancelled and the call fails with
//! `EndpointError::Timeout`.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tower::{Layer, Service};

use crate::endpoint::request::{EndpointError, Invocation};

// ---------------------------------------------------------------------------
// TimeoutLayer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct TimeoutLayer {
    default_timeout: Duration,
}

impl TimeoutLayer {
    #[must_use]
    pub fn new(default_timeout: Duration) -> Self {
        Self { default_timeout }
    }
}

impl<S> Layer<S> for TimeoutLayer {
    type Service = TimeoutService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TimeoutService {
            inner,
            default_timeout: self.default_timeout,
        }
    }
}

// ---------------------------------------------------------------------------
// TimeoutService
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TimeoutService<S> {
    inner: S,
    default_timeout: Duration,
}

impl<S, R> Service<Invocation<R>> for TimeoutService<S>
where
    S: Service<Invocation<R>, Error = EndpointError> + Send,
    S::Future: Send + 'static,
    S::Response: Send + 'static,
{
    type Response = S::Response;
    type Error = EndpointError;
    type Future = Pin<Box<dyn Future<Output = Result<S::Response, EndpointError>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, inv: Invocation<R>) -> Self::Future {
        let Invocation { ctx, request } = inv;
        let ctx = match ctx.deadline() {
            Some(_) => ctx.child(),
            None => ctx.child().with_timeout(self.default_timeout),
        };
        let budget = ctx.remaining().unwrap_or(self.default_timeout);
        #[allow(clippy::cast_possible_truncation)]
        let timeout_ms = budget.as_millis() as u64;

        let guard = ctx.clone();
        let fut = self.inner.call(Invocation::new(ctx, request));
        Box::pin(async move {
            match tokio::time::timeout(budget, fut).await {
                Ok(result) => result,
                Err(_elapsed) => {
                    guard.cancel();
                    Err(EndpointError::Timeout { timeout_ms })
                }
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tower::util::service_fn;
    use tower::ServiceExt;
    use workout_core::RequestContext;

    use super::*;
    use crate::endpoint::request::GetMovementRequest;
    use crate::endpoint::set::make_get_endpoint;
    use crate::test_support::ScriptedService;

    fn get_call(ctx: RequestContext) -> Invocation<GetMovementRequest> {
        Invocation::new(ctx, GetMovementRequest::default())
    }

    #[tokio::test(start_paused = true)]
    async fn completes_within_timeout() {
        let svc = ScriptedService::succeeding()
            .with_delay(Duration::from_millis(10))
            .into_arc();
        let endpoint = TimeoutLayer::new(Duration::from_secs(1)).layer(make_get_endpoint(svc));

        let resp = endpoint
            .oneshot(get_call(RequestContext::default()))
            .await
            .unwrap();
        assert!(resp.data().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn default_timeout_applies_without_deadline() {
        let svc = ScriptedService::succeeding()
            .with_delay(Duration::from_millis(200))
            .into_arc();
        let endpoint = TimeoutLayer::new(Duration::from_millis(50)).layer(make_get_endpoint(svc));

        let err = endpoint
            .oneshot(get_call(RequestContext::default()))
            .await
            .unwrap_err();
        assert_eq!(err, EndpointError::Timeout { timeout_ms: 50 });
    }

    #[tokio::test(start_paused = true)]
    async fn caller_deadline_takes_precedence() {
        let svc = ScriptedService::succeeding()
            .with_delay(Duration::from_millis(200))
            .into_arc();
        let endpoint = TimeoutLayer::new(Duration::from_secs(30)).layer(make_get_endpoint(svc));

        let ctx = RequestContext::default().with_timeout(Duration::from_millis(20));
        let err = endpoint.oneshot(get_call(ctx)).await.unwrap_err();
        assert_eq!(err, EndpointError::Timeout { timeout_ms: 20 });
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_cancels_inner_context_only() {
        let seen: Arc<Mutex<Option<RequestContext>>> = Arc::new(Mutex::new(None));
        let inner = service_fn({
            let seen = Arc::clone(&seen);
            move |inv: Invocation<()>| {
                *seen.lock().unwrap() = Some(inv.ctx.clone());
                async move {
                    inv.ctx.cancelled().await;
                    Ok::<_, EndpointError>(())
                }
            }
        });
        let endpoint = TimeoutLayer::new(Duration::from_millis(30)).layer(inner);

        let caller = RequestContext::default();
        let err = endpoint
            .oneshot(Invocation::new(caller.clone(), ()))
            .await
            .unwrap_err();

        assert!(matches!(err, EndpointError::Timeout { .. }));
        let inner_ctx = seen.lock().unwrap().take().unwrap();
        assert!(inner_ctx.is_cancelled());
        assert!(!caller.is_cancelled());
    }
}
