//! Transport-agnostic endpoints for the movement operations.
//!
//! Each operation is a typed `tower::Service<Invocation<Req>>` returning a
//! response envelope. Service failures are carried inside the envelope;
//! `EndpointError` is reserved for failures of the pipeline itself
//! (overload, timeout).

pub mod middleware;
pub mod request;
pub mod set;

pub use middleware::{build_endpoint_pipeline, LoadShedLayer, OutcomeLayer, TimeoutLayer};
pub use request::{
    CreateMovementRequest, CreateMovementResponse, DeleteMovementRequest, DeleteMovementResponse,
    Endpoint, EndpointError, Envelope, Failer, GetMovementRequest, GetMovementResponse, Invocation,
    ListMovementsRequest, ListMovementsResponse,
};
pub use set::{
    make_create_endpoint, make_delete_endpoint, make_get_endpoint, make_list_endpoint, MovementSet,
};
