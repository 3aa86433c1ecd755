//! Outbound (driven) ports of the scheduling subsystem.

use crate::domain::errors::SchedulerError;
use crate::domain::request::{ExecResult, PendingRequest, ResourceId};
use tokio::task::JoinHandle;

/// Pool of executor resources that run admitted transactions.
///
/// ## Contract
///
/// - `submit` must only be called after `is_available` returned true, and
///   must return the resource it bound the execution to.
/// - `release_resource` returns a resource to the pool. The completion
///   sweep calls it every tick for still-running executions as well as on
///   settlement, so implementations must tolerate repeated releases of the
///   same resource.
/// - `on_no_liquidity` marks a resource as out of operator funds; the pool
///   must stop handing it out until it is refunded.
pub trait ExecutorPool: Send + Sync {
    /// Binds the request to a free resource and spawns its execution.
    fn submit(
        &self,
        request: &PendingRequest,
    ) -> Result<(ResourceId, JoinHandle<ExecResult>), SchedulerError>;

    /// True when at least one resource is free.
    fn is_available(&self) -> bool;

    /// Marks the resource as drained of operator funds.
    fn on_no_liquidity(&self, resource_id: ResourceId);

    /// Returns the resource to the pool.
    fn release_resource(&self, resource_id: ResourceId);
}

/// Observation hooks on scheduling decisions. All hooks default to no-ops.
pub trait SchedulerHooks: Send + Sync {
    /// A request settled with a `Done` result.
    fn on_request_done(&self, _request: &PendingRequest, _result: &ExecResult) {}

    /// A request left the scheduler without settling (dispatch failure or
    /// panicked execution).
    fn on_request_dropped(&self, _request: &PendingRequest) {}

    /// A resource was suspended for lack of operator funds.
    fn on_no_liquidity(&self, _resource_id: ResourceId) {}
}

/// Hook implementation that observes nothing.
pub struct NoopHooks;

impl SchedulerHooks for NoopHooks {}
