//! Scheduler configuration.

use std::time::Duration;

/// Tunables for the queue, dispatch loop, and completion sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Queue capacity; the lowest-priority requests are evicted beyond it.
    pub tx_queue_max_size: usize,
    /// Interval of the completion sweep, in milliseconds.
    pub check_task_interval_ms: u64,
    /// Number of executor resources the local pool provisions.
    pub executor_count: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tx_queue_max_size: 4096,
            check_task_interval_ms: 50,
            executor_count: 8,
        }
    }
}

impl SchedulerConfig {
    /// Small queue and a fast sweep, for tests that exercise eviction and
    /// completion handling without waiting on production intervals.
    pub fn for_testing() -> Self {
        Self {
            tx_queue_max_size: 16,
            check_task_interval_ms: 5,
            executor_count: 2,
        }
    }

    /// Completion-sweep interval as a `Duration`.
    pub fn check_task_interval(&self) -> Duration {
        Duration::from_millis(self.check_task_interval_ms)
    }
}
