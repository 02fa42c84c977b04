//! Wire-level binding of the movement endpoints.
//!
//! [`adapter`] maps wire messages to typed endpoint calls and back;
//! [`client`] speaks the same protocol over HTTP. The HTTP server side lives
//! in `network`.

pub mod adapter;
pub mod client;

pub use adapter::{MovementTransport, RpcServer};
pub use client::{ClientError, MovementClient};

pub const CREATE_MOVEMENT_PATH: &str = "/rpc/CreateMovement";
pub const GET_MOVEMENT_PATH: &str = "/rpc/GetMovement";
pub const LIST_MOVEMENTS_PATH: &str = "/rpc/ListMovements";
pub const DELETE_MOVEMENT_PATH: &str = "/rpc/DeleteMovement";

/// Caller-supplied deadline for one call, in milliseconds.
pub const REQUEST_TIMEOUT_HEADER: &str = "x-request-timeout-ms";
