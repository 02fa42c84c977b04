//! Workout manager server: movement service, decorator chain, endpoint
//! pipeline, wire transport, and the HTTP binding that serves it.

pub mod endpoint;
pub mod logging;
pub mod network;
pub mod service;
pub mod storage;
pub mod traits;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use traits::MovementStore;
