//! In-process executor pool.

use crate::domain::errors::SchedulerError;
use crate::domain::request::{ExecResult, PendingRequest, ResourceId};
use crate::ports::outbound::ExecutorPool;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Runs one execution attempt against the foreign ledger.
#[async_trait]
pub trait SubmissionBackend: Send + Sync + 'static {
    async fn execute(&self, request: PendingRequest) -> ExecResult;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Free,
    Busy,
    /// Out of operator funds; withheld until refunded.
    Suspended,
}

/// Fixed-size pool of executor slots backed by a submission backend.
///
/// Each slot corresponds to one operator-funded executor resource. `submit`
/// binds a request to the first free slot and spawns the backend call on
/// the runtime; the completion sweep's repeated `release_resource` calls
/// are idempotent on a free slot.
pub struct LocalExecutorPool<B: SubmissionBackend> {
    backend: Arc<B>,
    slots: Mutex<Vec<SlotState>>,
}

impl<B: SubmissionBackend> LocalExecutorPool<B> {
    pub fn new(executor_count: u32, backend: Arc<B>) -> Self {
        info!(executor_count, "provisioning local executor pool");
        Self {
            backend,
            slots: Mutex::new(vec![SlotState::Free; executor_count as usize]),
        }
    }

    /// Number of slots currently free.
    pub fn free_count(&self) -> usize {
        self.slots
            .lock()
            .iter()
            .filter(|slot| **slot == SlotState::Free)
            .count()
    }

    /// Returns a suspended slot to service after its funds are topped up.
    pub fn refund(&self, resource_id: ResourceId) {
        let mut slots = self.slots.lock();
        if let Some(slot) = slots.get_mut(resource_id as usize) {
            if *slot == SlotState::Suspended {
                info!(resource_id, "executor resource refunded");
                *slot = SlotState::Free;
            }
        }
    }
}

impl<B: SubmissionBackend> ExecutorPool for LocalExecutorPool<B> {
    fn submit(
        &self,
        request: &PendingRequest,
    ) -> Result<(ResourceId, JoinHandle<ExecResult>), SchedulerError> {
        let resource_id = {
            let mut slots = self.slots.lock();
            let free = slots
                .iter()
                .position(|slot| *slot == SlotState::Free)
                .ok_or(SchedulerError::NoResourceAvailable)?;
            slots[free] = SlotState::Busy;
            free as ResourceId
        };

        let backend = Arc::clone(&self.backend);
        let request = request.clone();
        let handle = tokio::spawn(async move { backend.execute(request).await });
        Ok((resource_id, handle))
    }

    fn is_available(&self) -> bool {
        self.slots
            .lock()
            .iter()
            .any(|slot| *slot == SlotState::Free)
    }

    fn on_no_liquidity(&self, resource_id: ResourceId) {
        let mut slots = self.slots.lock();
        if let Some(slot) = slots.get_mut(resource_id as usize) {
            warn!(resource_id, "suspending executor resource, out of funds");
            *slot = SlotState::Suspended;
        }
    }

    fn release_resource(&self, resource_id: ResourceId) {
        let mut slots = self.slots.lock();
        if let Some(slot) = slots.get_mut(resource_id as usize) {
            if *slot == SlotState::Busy {
                *slot = SlotState::Free;
            }
        }
    }
}
