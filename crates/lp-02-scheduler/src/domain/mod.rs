//! Scheduler domain: requests, the priority queue, and execution outcomes.

pub mod errors;
pub mod queue;
pub mod request;

pub use errors::SchedulerError;
pub use queue::RequestQueue;
pub use request::{ExecResult, ExecResultCode, InFlightTask, PendingRequest, ResourceId};
