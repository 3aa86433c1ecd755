//! # Transaction Scheduling Subsystem
//!
//! Holds admitted transactions in a bounded priority queue, dispatches them
//! to an operator-funded executor pool, and monitors the running executions
//! until they settle.
//!
//! ## Components
//!
//! | Component | Role |
//! |-----------|------|
//! | `RequestQueue` | Bounded sorted queue, highest-priority request pops first |
//! | `TxScheduler` | Kick-driven dispatch loop plus the completion sweep |
//! | `ExecutorPool` | Port to the executor resources that run transactions |
//! | `LocalExecutorPool` | In-process pool adapter over a submission backend |
//! | `ServiceFront` | Channel-fed facade feeding the scheduler |
//!
//! ## Dispatch Discipline
//!
//! The queue loop sleeps until kicked. Every kick dispatches at most one
//! request, and only when an executor resource is available; an unavailable
//! pool leaves the queue untouched until a completion kicks the loop again.
//!
//! ## Completion Sweep
//!
//! A fixed-interval sweep inspects every in-flight execution:
//!
//! | Outcome | Action |
//! |---------|--------|
//! | Still running | Keep in flight, release the resource for this tick |
//! | `Done` | Release the resource, kick the queue loop |
//! | `ToBeRepeat` | Release the resource, drop the request |
//! | `NoLiquidity` | Suspend the resource, re-enqueue the request |
//! | `Dummy` | Programming error, panics the sweep |
//! | Panicked task | Release the resource, drop the request |

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{LocalExecutorPool, ServiceFront, SubmissionBackend};
pub use config::SchedulerConfig;
pub use domain::{
    ExecResult, ExecResultCode, InFlightTask, PendingRequest, RequestQueue, ResourceId,
    SchedulerError,
};
pub use ports::{ExecutorPool, NoopHooks, SchedulerHooks};
pub use service::TxScheduler;
