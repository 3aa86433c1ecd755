//! # Scheduling Flow
//!
//! End-to-end choreography: admitted requests enter through the service
//! front, the dispatch loop binds them to the local executor pool, and the
//! completion sweep settles the outcomes.

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use lp_02_scheduler::{
        ExecResult, ExecResultCode, LocalExecutorPool, PendingRequest, RequestQueue,
        SchedulerConfig, SchedulerHooks, ServiceFront, SubmissionBackend, TxScheduler,
    };
    use parking_lot::Mutex;
    use shared_types::{EmulationTrace, EvmTransaction, TxExecConfig, U256};
    use std::sync::Arc;
    use std::time::Duration;

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    /// Opt-in log output for debugging: `RUST_LOG=debug cargo test -p lp-tests`.
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn request(signature_byte: u8, gas_price: u64) -> PendingRequest {
        PendingRequest::new(
            EvmTransaction {
                from: [0x11; 20],
                to: Some([0x22; 20]),
                nonce: U256::zero(),
                gas_price: U256::from(gas_price),
                gas_limit: U256::from(21_000u64),
                value: U256::zero(),
                call_data: vec![],
                chain_id: Some(111),
                signature: [signature_byte; 65],
            },
            TxExecConfig {
                gas_limit: U256::from(21_000u64),
                is_underpriced_without_chainid: false,
            },
            EmulationTrace::default(),
        )
    }

    /// Backend that records execution order and returns a scripted outcome
    /// per signature byte.
    struct RecordingBackend {
        executed: Mutex<Vec<u8>>,
        no_liquidity_for: Option<u8>,
    }

    impl RecordingBackend {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                executed: Mutex::new(Vec::new()),
                no_liquidity_for: None,
            })
        }

        fn failing_liquidity_for(signature_byte: u8) -> Arc<Self> {
            Arc::new(Self {
                executed: Mutex::new(Vec::new()),
                no_liquidity_for: Some(signature_byte),
            })
        }
    }

    #[async_trait]
    impl SubmissionBackend for RecordingBackend {
        async fn execute(&self, request: PendingRequest) -> ExecResult {
            let signature_byte = request.tx.signature[0];
            self.executed.lock().push(signature_byte);
            if self.no_liquidity_for == Some(signature_byte) {
                return ExecResult::with_code(ExecResultCode::NoLiquidity);
            }
            ExecResult::done(Some(serde_json::json!({ "status": "ok" })))
        }
    }

    #[derive(Default)]
    struct CountingHooks {
        done: Mutex<Vec<String>>,
        dropped: Mutex<Vec<String>>,
        suspended: Mutex<Vec<u32>>,
    }

    impl SchedulerHooks for CountingHooks {
        fn on_request_done(&self, request: &PendingRequest, _result: &ExecResult) {
            self.done.lock().push(request.tx.tx_hash_hex());
        }

        fn on_request_dropped(&self, request: &PendingRequest) {
            self.dropped.lock().push(request.tx.tx_hash_hex());
        }

        fn on_no_liquidity(&self, resource_id: u32) {
            self.suspended.lock().push(resource_id);
        }
    }

    fn build_scheduler(
        backend: Arc<RecordingBackend>,
        executor_count: u32,
    ) -> (Arc<TxScheduler>, Arc<LocalExecutorPool<RecordingBackend>>, Arc<CountingHooks>) {
        let pool = Arc::new(LocalExecutorPool::new(executor_count, backend));
        let hooks = Arc::new(CountingHooks::default());
        let scheduler = Arc::new(TxScheduler::new(
            SchedulerConfig::for_testing(),
            Arc::clone(&pool) as _,
            Arc::clone(&hooks) as _,
        ));
        (scheduler, pool, hooks)
    }

    // =========================================================================
    // FLOWS
    // =========================================================================

    #[tokio::test(flavor = "multi_thread")]
    async fn test_front_to_settlement_round_trip() {
        init_tracing();
        let backend = RecordingBackend::new();
        let (scheduler, pool, hooks) = build_scheduler(Arc::clone(&backend), 2);
        let (tx, front) = ServiceFront::channel(Arc::clone(&scheduler), 16);
        let front_handle = front.spawn();
        let (queue_loop, completion_loop) = scheduler.spawn();

        tx.send(request(0xA0, 5)).await.unwrap();
        tx.send(request(0xB0, 5)).await.unwrap();
        tx.send(request(0xC0, 5)).await.unwrap();

        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(hooks.done.lock().len(), 3);
        assert!(hooks.dropped.lock().is_empty());
        assert_eq!(scheduler.queue_len(), 0);
        assert_eq!(scheduler.in_flight_len(), 0);
        assert_eq!(pool.free_count(), 2);

        drop(tx);
        front_handle.abort();
        queue_loop.abort();
        completion_loop.abort();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_signature_outranks_gas_price_in_dispatch_order() {
        let backend = RecordingBackend::new();
        // Single executor forces strictly sequential dispatch.
        let (scheduler, _pool, hooks) = build_scheduler(Arc::clone(&backend), 1);
        // Queue everything before the loops start so the first wake sees
        // the full ordering.
        scheduler.enqueue(request(0x10, 1_000_000));
        scheduler.enqueue(request(0x90, 1));
        scheduler.enqueue(request(0x50, 500));
        let (queue_loop, completion_loop) = scheduler.spawn();

        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(hooks.done.lock().len(), 3);
        // The low-price, high-signature request runs first.
        assert_eq!(*backend.executed.lock(), vec![0x90, 0x50, 0x10]);

        queue_loop.abort();
        completion_loop.abort();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_no_liquidity_suspends_and_requeues() {
        let backend = RecordingBackend::failing_liquidity_for(0xA0);
        let (scheduler, pool, hooks) = build_scheduler(Arc::clone(&backend), 1);

        scheduler.enqueue(request(0xA0, 5));
        scheduler.process_queue_signal();
        tokio::time::sleep(Duration::from_millis(20)).await;
        scheduler.sweep_in_flight().await;

        // The request waits in the queue for capacity that no longer exists.
        assert_eq!(scheduler.queue_len(), 1);
        assert_eq!(scheduler.in_flight_len(), 0);
        assert_eq!(*hooks.suspended.lock(), vec![0]);
        assert_eq!(pool.free_count(), 0);

        // A wake with every resource suspended leaves the queue untouched.
        scheduler.process_queue_signal();
        assert_eq!(scheduler.queue_len(), 1);

        // Refunding the resource lets the retry go through.
        pool.refund(0);
        scheduler.process_queue_signal();
        assert_eq!(scheduler.queue_len(), 0);
        assert_eq!(scheduler.in_flight_len(), 1);
    }

    #[tokio::test]
    async fn test_queue_capacity_bound_holds() {
        use rand::Rng;
        let mut rng = rand::thread_rng();

        let mut queue = RequestQueue::new(4096);
        for _ in 0..5000 {
            queue.insert(request(rng.gen(), rng.gen()));
            assert!(queue.len() <= 4096);
        }
        assert_eq!(queue.len(), 4096);

        // Pops come out in non-increasing priority order.
        let mut previous = queue.pop().unwrap();
        while let Some(next) = queue.pop() {
            assert!(next <= previous);
            previous = next;
        }
    }
}
