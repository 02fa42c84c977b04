//! Tower middleware layers for the endpoint pipeline.
//!
//! - [`load_shed`]: Semaphore-based concurrency limiting
//! - [`timeout`]: Deadline enforcement with context cancellation
//! - [`outcome`]: Per-endpoint span, duration, and outcome classification
//! - [`pipeline`]: Composes all layers around one endpoint

pub mod load_shed;
pub mod outcome;
pub mod pipeline;
pub mod timeout;

pub use load_shed::LoadShedLayer;
pub use outcome::OutcomeLayer;
pub use pipeline::build_endpoint_pipeline;
pub use timeout::TimeoutLayer;
