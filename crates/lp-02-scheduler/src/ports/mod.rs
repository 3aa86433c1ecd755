//! Ports of the scheduling subsystem.

pub mod outbound;

pub use outbound::{ExecutorPool, NoopHooks, SchedulerHooks};
