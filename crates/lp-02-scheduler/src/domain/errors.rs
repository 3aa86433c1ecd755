//! Scheduler error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// The pool has no free executor resource to run the request on.
    #[error("no executor resource available")]
    NoResourceAvailable,

    /// The pool failed to hand the request to an executor.
    #[error("submission failed: {0}")]
    Submit(String),
}
