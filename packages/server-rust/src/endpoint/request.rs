//! Typed endpoint requests, response envelopes, and endpoint-level errors.

use tower::util::BoxCloneSyncService;
use workout_core::{Movement, MovementId, RequestContext};

use crate::service::MovementError;

// ---------------------------------------------------------------------------
// Invocation
// ---------------------------------------------------------------------------

/// A single endpoint call: the caller's context paired with a typed request.
#[derive(Debug, Clone)]
pub struct Invocation<R> {
    pub ctx: RequestContext,
    pub request: R,
}

impl<R> Invocation<R> {
    #[must_use]
    pub fn new(ctx: RequestContext, request: R) -> Self {
        Self { ctx, request }
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateMovementRequest {
    pub tenant_id: String,
    pub name: String,
    pub category_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetMovementRequest {
    pub id: MovementId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListMovementsRequest {
    /// Empty means no filter.
    pub category_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteMovementRequest {
    pub id: MovementId,
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Exposes a business failure carried inside an endpoint response.
///
/// Lets generic middleware tell a failed call from a successful one without
/// knowing which operation produced the response.
pub trait Failer {
    fn failed(&self) -> Option<&MovementError>;
}

/// Response envelope: either the operation's payload or the service error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope<T>(Result<T, MovementError>);

impl<T> Envelope<T> {
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self(Ok(data))
    }

    #[must_use]
    pub fn failure(err: MovementError) -> Self {
        Self(Err(err))
    }

    #[must_use]
    pub fn data(&self) -> Option<&T> {
        self.0.as_ref().ok()
    }

    #[must_use]
    pub fn error(&self) -> Option<&MovementError> {
        self.0.as_ref().err()
    }

    /// Unwraps the envelope into the service result it carries.
    ///
    /// # Errors
    ///
    /// Returns the carried `MovementError` when the call failed.
    pub fn into_result(self) -> Result<T, MovementError> {
        self.0
    }
}

impl<T> From<Result<T, MovementError>> for Envelope<T> {
    fn from(result: Result<T, MovementError>) -> Self {
        Self(result)
    }
}

impl<T> Failer for Envelope<T> {
    fn failed(&self) -> Option<&MovementError> {
        self.error()
    }
}

pub type CreateMovementResponse = Envelope<Movement>;
pub type GetMovementResponse = Envelope<Movement>;
pub type ListMovementsResponse = Envelope<Vec<Movement>>;
pub type DeleteMovementResponse = Envelope<()>;

// ---------------------------------------------------------------------------
// EndpointError
// ---------------------------------------------------------------------------

/// Failures raised by the endpoint pipeline itself, before or instead of a
/// service response. Transports surface these as protocol-level errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("server overloaded")]
    Overloaded,
    #[error("internal endpoint error: {0}")]
    Internal(String),
}

/// Boxed, cloneable endpoint for one operation.
pub type Endpoint<Req, Resp> = BoxCloneSyncService<Invocation<Req>, Resp, EndpointError>;
