//! Per-request execution context.
//!
//! A [`RequestContext`] is created by the transport for every inbound call and
//! passed by reference through the endpoint, decorator, and service layers. It
//! carries the call identity used in logs, an optional deadline, and a
//! cancellation token the caller (or a timeout) can trip.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};

/// Reasons a context no longer allows new work to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("request cancelled")]
    Cancelled,
    #[error("request deadline exceeded")]
    DeadlineExceeded,
}

/// Per-request context carrying tracing identity, deadline, and cancellation.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Identifier assigned by the transport for this call.
    pub call_id: u64,
    /// Distributed trace identifier for observability.
    pub trace_id: String,
    deadline: Option<Instant>,
    cancellation: CancellationToken,
}

impl RequestContext {
    /// Creates a context with no deadline and a fresh cancellation token.
    #[must_use]
    pub fn new(call_id: u64, trace_id: impl Into<String>) -> Self {
        Self {
            call_id,
            trace_id: trace_id.into(),
            deadline: None,
            cancellation: CancellationToken::new(),
        }
    }

    /// Returns the context with `deadline` applied. An earlier existing
    /// deadline is kept.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) if existing <= deadline => existing,
            _ => deadline,
        });
        self
    }

    /// Returns the context with a deadline `timeout` from now. A timeout too
    /// large to represent as an `Instant` leaves the context unchanged.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Derives a child context sharing identity and deadline.
    ///
    /// Cancelling the parent cancels the child; cancelling the child leaves
    /// the parent untouched.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            call_id: self.call_id,
            trace_id: self.trace_id.clone(),
            deadline: self.deadline,
            cancellation: self.cancellation.child_token(),
        }
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline. `None` when no deadline is set.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Cancels this context and every child derived from it.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Returns a guard that cancels this context when dropped.
    ///
    /// Transports hold it for the lifetime of a call so that a disconnected
    /// caller cancels any work still running on its behalf.
    #[must_use]
    pub fn cancel_on_drop(&self) -> DropGuard {
        self.cancellation.clone().drop_guard()
    }

    /// Completes once the context is cancelled.
    pub async fn cancelled(&self) {
        self.cancellation.cancelled().await;
    }

    /// Checks whether work may still start under this context.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::Cancelled` if the token was tripped, or
    /// `ContextError::DeadlineExceeded` if the deadline has passed.
    pub fn check(&self) -> Result<(), ContextError> {
        if self.cancellation.is_cancelled() {
            return Err(ContextError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(ContextError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new(0, String::new())
    }
}

impl fmt::Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "call_id={} trace_id={}", self.call_id, self.trace_id)?;
        if let Some(remaining) = self.remaining() {
            write!(f, " remaining_ms={}", remaining.as_millis())?;
        }
        Ok(())
    }
}
