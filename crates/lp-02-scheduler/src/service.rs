//! Kick-driven dispatch and the completion sweep.

use crate::config::SchedulerConfig;
use crate::domain::queue::RequestQueue;
use crate::domain::request::{ExecResult, ExecResultCode, InFlightTask, PendingRequest, ResourceId};
use crate::ports::outbound::{ExecutorPool, SchedulerHooks};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, warn};

/// Schedules admitted transactions onto an executor pool.
///
/// Two loops cooperate through shared state:
///
/// - the queue loop sleeps on a kick signal and dispatches at most one
///   request per wake, when the pool has a free resource;
/// - the completion sweep runs on a fixed interval and settles finished
///   executions, kicking the queue loop whenever a `Done` result frees a
///   resource.
///
/// `enqueue` also kicks, so an idle scheduler reacts to new work without
/// waiting for a sweep tick.
pub struct TxScheduler {
    config: SchedulerConfig,
    pool: Arc<dyn ExecutorPool>,
    hooks: Arc<dyn SchedulerHooks>,
    queue: Mutex<RequestQueue>,
    in_flight: Mutex<Vec<InFlightTask>>,
    kick: Notify,
}

impl TxScheduler {
    pub fn new(
        config: SchedulerConfig,
        pool: Arc<dyn ExecutorPool>,
        hooks: Arc<dyn SchedulerHooks>,
    ) -> Self {
        let queue = Mutex::new(RequestQueue::new(config.tx_queue_max_size));
        Self {
            config,
            pool,
            hooks,
            queue,
            in_flight: Mutex::new(Vec::new()),
            kick: Notify::new(),
        }
    }

    /// Adds an admitted request to the queue and kicks the dispatch loop.
    pub fn enqueue(&self, request: PendingRequest) {
        debug!(tx_hash = %request.tx.tx_hash_hex(), "enqueue request");
        self.queue.lock().insert(request);
        self.kick.notify_one();
    }

    pub fn queue_len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.lock().len()
    }

    /// Spawns the dispatch loop and the completion sweep. Both run until
    /// their handles are aborted.
    pub fn spawn(
        self: &Arc<Self>,
    ) -> (
        tokio::task::JoinHandle<()>,
        tokio::task::JoinHandle<()>,
    ) {
        let queue_loop = {
            let scheduler = Arc::clone(self);
            tokio::spawn(async move { scheduler.run_queue_loop().await })
        };
        let completion_loop = {
            let scheduler = Arc::clone(self);
            tokio::spawn(async move { scheduler.run_completion_loop().await })
        };
        (queue_loop, completion_loop)
    }

    async fn run_queue_loop(&self) {
        loop {
            self.kick.notified().await;
            self.process_queue_signal();
        }
    }

    async fn run_completion_loop(&self) {
        let mut ticker = tokio::time::interval(self.config.check_task_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            self.sweep_in_flight().await;
        }
    }

    /// One wake of the dispatch loop: pop the highest-priority request and
    /// submit it, provided the pool has a free resource.
    pub fn process_queue_signal(&self) {
        let mut queue = self.queue.lock();
        if queue.is_empty() {
            debug!("queue empty, continue waiting");
            return;
        }
        if !self.pool.is_available() {
            debug!("no executor resource available, continue waiting");
            return;
        }
        // Non-empty and a resource is free, so pop cannot fail.
        let Some(request) = queue.pop() else {
            return;
        };
        drop(queue);
        self.dispatch(request);
    }

    fn dispatch(&self, request: PendingRequest) {
        match self.pool.submit(&request) {
            Ok((resource_id, handle)) => {
                debug!(
                    tx_hash = %request.tx.tx_hash_hex(),
                    resource_id,
                    "request dispatched"
                );
                self.in_flight.lock().push(InFlightTask {
                    resource_id,
                    handle,
                    request,
                });
            }
            Err(err) => {
                error!(
                    tx_hash = %request.tx.tx_hash_hex(),
                    %err,
                    "failed to dispatch request, dropping it"
                );
                self.hooks.on_request_dropped(&request);
            }
        }
    }

    /// One tick of the completion sweep.
    ///
    /// The in-flight list is taken out of the lock for the duration of the
    /// sweep; dispatches that land mid-sweep append to the emptied list and
    /// both survive the final merge.
    pub async fn sweep_in_flight(&self) {
        let tasks = std::mem::take(&mut *self.in_flight.lock());
        let mut still_running = Vec::with_capacity(tasks.len());

        for task in tasks {
            if !task.handle.is_finished() {
                // Running executions give their resource back every tick so
                // the pool can account it as schedulable.
                self.pool.release_resource(task.resource_id);
                still_running.push(task);
                continue;
            }

            let InFlightTask {
                resource_id,
                handle,
                request,
            } = task;
            match handle.await {
                Ok(result) => self.route_result(resource_id, request, result),
                Err(err) => {
                    error!(
                        tx_hash = %request.tx.tx_hash_hex(),
                        resource_id,
                        %err,
                        "execution task failed, dropping request"
                    );
                    self.hooks.on_request_dropped(&request);
                    self.pool.release_resource(resource_id);
                }
            }
        }

        self.in_flight.lock().extend(still_running);
    }

    fn route_result(&self, resource_id: ResourceId, request: PendingRequest, result: ExecResult) {
        match result.code {
            ExecResultCode::Done => {
                debug!(
                    tx_hash = %request.tx.tx_hash_hex(),
                    resource_id,
                    "request done"
                );
                self.hooks.on_request_done(&request, &result);
                self.pool.release_resource(resource_id);
                self.kick.notify_one();
            }
            ExecResultCode::ToBeRepeat => {
                warn!(
                    tx_hash = %request.tx.tx_hash_hex(),
                    resource_id,
                    "transient execution failure, client must resubmit"
                );
                self.pool.release_resource(resource_id);
            }
            ExecResultCode::NoLiquidity => {
                warn!(
                    tx_hash = %request.tx.tx_hash_hex(),
                    resource_id,
                    "executor resource out of funds, re-queueing request"
                );
                self.pool.on_no_liquidity(resource_id);
                self.hooks.on_no_liquidity(resource_id);
                // Requeue through enqueue so the dispatch loop is kicked;
                // another resource may be free right now.
                self.enqueue(request);
            }
            ExecResultCode::Dummy => {
                panic!("dummy execution result reached the completion sweep");
            }
        }
    }
}
