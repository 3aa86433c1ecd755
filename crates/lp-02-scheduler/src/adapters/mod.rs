//! Adapters of the scheduling subsystem.

pub mod front;
pub mod local_pool;

pub use front::ServiceFront;
pub use local_pool::{LocalExecutorPool, SubmissionBackend};
