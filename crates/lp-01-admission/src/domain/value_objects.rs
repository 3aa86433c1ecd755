//! Value objects produced by the admission pipeline.

use shared_types::{EmulationTrace, TxExecConfig};

/// Successful outcome of `TxValidator::precheck`.
///
/// Bundles the emulation trace with the parameters the scheduler carries
/// forward. The underpriced-no-chain-id flag is consumed downstream for fee
/// accounting and is not re-validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecheckResult {
    /// Trace produced by emulating the transaction during admission.
    pub emulation: EmulationTrace,
    /// The transaction was admitted through the underpriced, no-chain-id
    /// exception.
    pub is_underpriced_without_chainid: bool,
    /// Derived execution parameters (effective gas limit and the exception
    /// flag above).
    pub exec_config: TxExecConfig,
}
