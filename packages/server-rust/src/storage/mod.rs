//! Storage collaborators for the movement service.
//!
//! The [`MovementStore`](crate::traits::MovementStore) trait is the seam; this
//! module holds the implementations shipped with the server.

pub mod memory;

pub use memory::InMemoryMovementStore;
