//! Wire-compatible message schemas for the workout manager RPC surface.
//!
//! All types use camelCase field names and serialize identically through
//! JSON and named `MsgPack` (`rmp_serde::to_vec_named()`), so any transport
//! binding can carry them.

pub mod codec;
pub mod movement;

pub use codec::{CodecError, WireCodec};
pub use movement::{
    CreateMovementRequest, CreateMovementResponse, DeleteMovementRequest, DeleteMovementResponse,
    GetMovementRequest, GetMovementResponse, ListMovementsRequest, ListMovementsResponse,
    MovementMessage,
};
