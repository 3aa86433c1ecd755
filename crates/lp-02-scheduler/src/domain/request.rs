//! Pending requests and execution outcomes.

use serde::{Deserialize, Serialize};
use shared_types::{EmulationTrace, EvmTransaction, TxExecConfig, U256};
use std::cmp::Ordering;
use tokio::task::JoinHandle;

/// Identifier of one executor resource inside a pool.
pub type ResourceId = u32;

/// An admitted transaction waiting for dispatch.
///
/// Requests order by `(signature, gas_price)`: the raw signature bytes
/// compare lexicographically first, and the gas price breaks ties. The gas
/// price used for ordering is copied at construction and never re-read from
/// the transaction, so a request's position is stable for its lifetime.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    /// The admitted transaction.
    pub tx: EvmTransaction,
    /// Execution parameters derived during admission.
    pub exec_config: TxExecConfig,
    /// Trace from the admission-time emulation, carried to the executor so
    /// it does not have to re-emulate.
    pub emulation: EmulationTrace,
    gas_price: U256,
}

impl PendingRequest {
    pub fn new(tx: EvmTransaction, exec_config: TxExecConfig, emulation: EmulationTrace) -> Self {
        let gas_price = tx.gas_price;
        Self {
            tx,
            exec_config,
            emulation,
            gas_price,
        }
    }

    /// The gas price snapshotted at construction.
    pub fn gas_price(&self) -> U256 {
        self.gas_price
    }

    fn sort_key(&self) -> (&[u8; 65], U256) {
        (&self.tx.signature, self.gas_price)
    }
}

impl PartialEq for PendingRequest {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for PendingRequest {}

impl PartialOrd for PendingRequest {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PendingRequest {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// Outcome class reported by an executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecResultCode {
    /// Execution settled; the client-visible result is in `data`.
    Done,
    /// Transient failure the client must resubmit; the request is dropped.
    ToBeRepeat,
    /// The executor resource ran out of operator funds mid-flight.
    NoLiquidity,
    /// Placeholder that must never reach the completion sweep.
    Dummy,
}

/// Result of one execution attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecResult {
    pub code: ExecResultCode,
    /// Client-visible payload, present for `Done` results.
    pub data: Option<serde_json::Value>,
}

impl ExecResult {
    pub fn done(data: Option<serde_json::Value>) -> Self {
        Self {
            code: ExecResultCode::Done,
            data,
        }
    }

    pub fn with_code(code: ExecResultCode) -> Self {
        Self { code, data: None }
    }
}

/// A dispatched request whose execution has not been swept yet.
#[derive(Debug)]
pub struct InFlightTask {
    /// The executor resource running this request.
    pub resource_id: ResourceId,
    /// Handle of the spawned execution.
    pub handle: JoinHandle<ExecResult>,
    /// The request, kept for re-enqueueing on `NoLiquidity`.
    pub request: PendingRequest,
}
