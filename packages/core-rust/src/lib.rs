//! Workout manager core: movement domain model, request context, and wire schemas.

pub mod context;
pub mod messages;
pub mod movement;

pub use context::{ContextError, RequestContext};
pub use messages::{CodecError, WireCodec};
pub use movement::{Movement, MovementField, MovementId, NewMovement, ValidationError};
