//! Logging decorator for the movement service.
//!
//! Emits one structured event per call with the method, request context,
//! relevant request fields, and elapsed time. Events are parented to a span
//! bound with `service = "movement"`, so every entry carries that field.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{info_span, Span};
use workout_core::{Movement, MovementId, RequestContext};

use super::error::MovementError;
use super::layer::MovementLayer;
use super::movement::MovementService;

/// Logs the outcome of a call: `info` on success, `warn` with the error otherwise.
macro_rules! log_call {
    ($span:expr, $method:literal, $ctx:expr, $begin:expr, $result:expr, $($field:tt)*) => {
        match $result {
            Ok(_) => tracing::info!(
                parent: $span,
                method = $method,
                call_id = $ctx.call_id,
                trace_id = %$ctx.trace_id,
                $($field)*,
                took_ms = took_ms($begin),
                outcome = "ok",
                "movement call completed"
            ),
            Err(err) => tracing::warn!(
                parent: $span,
                method = $method,
                call_id = $ctx.call_id,
                trace_id = %$ctx.trace_id,
                $($field)*,
                took_ms = took_ms($begin),
                outcome = err.kind(),
                error = %err,
                "movement call failed"
            ),
        }
    };
}

#[allow(clippy::cast_possible_truncation)]
fn took_ms(begin: Instant) -> u64 {
    begin.elapsed().as_millis() as u64
}

// ---------------------------------------------------------------------------
// LoggingLayer
// ---------------------------------------------------------------------------

/// Layer producing [`LoggingMovementService`] decorators.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer;

impl MovementLayer for LoggingLayer {
    fn layer(&self, inner: Arc<dyn MovementService>) -> Arc<dyn MovementService> {
        Arc::new(LoggingMovementService::new(inner))
    }
}

// ---------------------------------------------------------------------------
// LoggingMovementService
// ---------------------------------------------------------------------------

pub struct LoggingMovementService {
    span: Span,
    inner: Arc<dyn MovementService>,
}

impl LoggingMovementService {
    #[must_use]
    pub fn new(inner: Arc<dyn MovementService>) -> Self {
        Self {
            span: info_span!("movement_service", service = "movement"),
            inner,
        }
    }
}

#[async_trait]
impl MovementService for LoggingMovementService {
    async fn create(
        &self,
        ctx: &RequestContext,
        tenant_id: &str,
        name: &str,
        category_id: &str,
    ) -> Result<Movement, MovementError> {
        let begin = Instant::now();
        let result = self.inner.create(ctx, tenant_id, name, category_id).await;
        log_call!(
            &self.span,
            "Create",
            ctx,
            begin,
            &result,
            tenant_id = tenant_id,
            movement_name = name,
            category_id = category_id
        );
        result
    }

    async fn get(&self, ctx: &RequestContext, id: &MovementId) -> Result<Movement, MovementError> {
        let begin = Instant::now();
        let result = self.inner.get(ctx, id).await;
        log_call!(&self.span, "Get", ctx, begin, &result, id = %id);
        result
    }

    async fn list(
        &self,
        ctx: &RequestContext,
        category_name: &str,
    ) -> Result<Vec<Movement>, MovementError> {
        let begin = Instant::now();
        let result = self.inner.list(ctx, category_name).await;
        log_call!(
            &self.span,
            "List",
            ctx,
            begin,
            &result,
            category_name = category_name
        );
        result
    }

    async fn delete(&self, ctx: &RequestContext, id: &MovementId) -> Result<(), MovementError> {
        let begin = Instant::now();
        let result = self.inner.delete(ctx, id).await;
        log_call!(&self.span, "Delete", ctx, begin, &result, id = %id);
        result
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
