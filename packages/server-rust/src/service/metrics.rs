//! Metrics decorator for the movement service.
//!
//! Records a request counter labelled by method and outcome, and a duration
//! histogram labelled by method, through the `metrics` facade. Without an
//! installed recorder the calls are no-ops.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use workout_core::{Movement, MovementId, RequestContext};

use super::error::MovementError;
use super::layer::MovementLayer;
use super::movement::MovementService;

pub const REQUESTS_TOTAL: &str = "movement_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "movement_request_duration_seconds";

fn record<T>(method: &'static str, begin: Instant, result: &Result<T, MovementError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(err) => err.kind(),
    };
    metrics::counter!(REQUESTS_TOTAL, "method" => method, "outcome" => outcome).increment(1);
    metrics::histogram!(REQUEST_DURATION_SECONDS, "method" => method)
        .record(begin.elapsed().as_secs_f64());
}

/// Layer producing [`MetricsMovementService`] decorators.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsLayer;

impl MovementLayer for MetricsLayer {
    fn layer(&self, inner: Arc<dyn MovementService>) -> Arc<dyn MovementService> {
        Arc::new(MetricsMovementService { inner })
    }
}

pub struct MetricsMovementService {
    inner: Arc<dyn MovementService>,
}

impl MetricsMovementService {
    #[must_use]
    pub fn new(inner: Arc<dyn MovementService>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl MovementService for MetricsMovementService {
    async fn create(
        &self,
        ctx: &RequestContext,
        tenant_id: &str,
        name: &str,
        category_id: &str,
    ) -> Result<Movement, MovementError> {
        let begin = Instant::now();
        let result = self.inner.create(ctx, tenant_id, name, category_id).await;
        record("create", begin, &result);
        result
    }

    async fn get(&self, ctx: &RequestContext, id: &MovementId) -> Result<Movement, MovementError> {
        let begin = Instant::now();
        let result = self.inner.get(ctx, id).await;
        record("get", begin, &result);
        result
    }

    async fn list(
        &self,
        ctx: &RequestContext,
        category_name: &str,
    ) -> Result<Vec<Movement>, MovementError> {
        let begin = Instant::now();
        let result = self.inner.list(ctx, category_name).await;
        record("list", begin, &result);
        result
    }

    async fn delete(&self, ctx: &RequestContext, id: &MovementId) -> Result<(), MovementError> {
        let begin = Instant::now();
        let result = self.inner.delete(ctx, id).await;
        record("delete", begin, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};
    use metrics_util::MetricKind;

    use super::*;
    use crate::test_support::{block_on, ScriptedService};

    #[tokio::test]
    async fn metrics_decorator_passes_through_response() {
        let base = ScriptedService::succeeding();
        let expected = base.list.clone();
        let svc = MetricsMovementService::new(base.into_arc());

        let result = svc.list(&RequestContext::default(), "").await;
        assert_eq!(result, expected);
    }

    #[tokio::test]
    async fn metrics_decorator_passes_through_error() {
        let err = MovementError::Persistence("disk full".to_string());
        let svc = MetricsLayer.layer(ScriptedService::failing(&err).into_arc());

        let result = svc.create(&RequestContext::default(), "t", "n", "c").await;
        assert_eq!(result, Err(err));
    }

    fn labels(key: &metrics::Key) -> Vec<(String, String)> {
        key.labels()
            .map(|label| (label.key().to_string(), label.value().to_string()))
            .collect()
    }

    #[test]
    fn records_requests_and_durations_by_method() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        let missing = MovementError::NotFound {
            id: MovementId::new("m-9"),
        };

        metrics::with_local_recorder(&recorder, || {
            block_on(async {
                let ctx = RequestContext::default();
                let ok = MetricsMovementService::new(ScriptedService::succeeding().into_arc());
                let failing = MetricsMovementService::new(ScriptedService::failing(&missing).into_arc());
                ok.list(&ctx, "").await.unwrap();
                failing.get(&ctx, &MovementId::new("m-9")).await.unwrap_err();
            });
        });

        let mut counters = Vec::new();
        let mut histograms = Vec::new();
        for (key, _unit, _description, value) in snapshotter.snapshot().into_vec() {
            match (key.kind(), value) {
                (MetricKind::Counter, DebugValue::Counter(count)) => {
                    assert_eq!(key.key().name(), REQUESTS_TOTAL);
                    counters.push((labels(key.key()), count));
                }
                (MetricKind::Histogram, DebugValue::Histogram(samples)) => {
                    assert_eq!(key.key().name(), REQUEST_DURATION_SECONDS);
                    histograms.push((labels(key.key()), samples.len()));
                }
                other => panic!("unexpected metric {other:?}"),
            }
        }
        counters.sort();
        histograms.sort();

        let pair = |k: &str, v: &str| (k.to_string(), v.to_string());
        assert_eq!(
            counters,
            vec![
                (vec![pair("method", "get"), pair("outcome", "not_found")], 1),
                (vec![pair("method", "list"), pair("outcome", "ok")], 1),
            ]
        );
        assert_eq!(
            histograms,
            vec![
                (vec![pair("method", "get")], 1),
                (vec![pair("method", "list")], 1),
            ]
        );
    }
}
