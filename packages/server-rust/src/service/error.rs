use workout_core::{ContextError, MovementId, ValidationError};

/// Errors returned by `MovementService` implementations.
///
/// Decorators pass these through unchanged and the endpoint layer carries them
/// inside the response envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MovementError {
    #[error("invalid movement: {0}")]
    Validation(#[from] ValidationError),
    #[error("movement {id} not found")]
    NotFound { id: MovementId },
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("internal contract violation: {0}")]
    Programming(String),
    #[error("request cancelled")]
    Cancelled,
    #[error("request deadline exceeded")]
    DeadlineExceeded,
}

impl MovementError {
    /// Wraps a storage collaborator failure, keeping its context chain.
    #[must_use]
    pub fn persistence(err: &anyhow::Error) -> Self {
        Self::Persistence(format!("{err:#}"))
    }

    /// Stable label used for log fields and metric outcomes.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound { .. } => "not_found",
            Self::Persistence(_) => "persistence",
            Self::Programming(_) => "programming",
            Self::Cancelled => "cancelled",
            Self::DeadlineExceeded => "deadline_exceeded",
        }
    }

    /// Whether a caller may reasonably retry the same request.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(_) | Self::DeadlineExceeded)
    }
}

impl From<ContextError> for MovementError {
    fn from(err: ContextError) -> Self {
        match err {
            ContextError::Cancelled => Self::Cancelled,
            ContextError::DeadlineExceeded => Self::DeadlineExceeded,
        }
    }
}
