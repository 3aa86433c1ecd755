//! Admission error types.
//!
//! Refusals surface to the RPC caller, so validation errors keep the exact
//! message wording clients match on. Nonce refusals carry a fixed
//! structured code distinct from generic validation errors.

use shared_types::U256;
use thiserror::Error;

/// Structured error code attached to nonce refusals.
pub const NONCE_ERROR_CODE: i64 = -32002;

/// A user-correctable admission refusal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Human-readable refusal, surfaced to the submitting client.
    pub message: String,
    /// Optional structured code (`NONCE_ERROR_CODE` for nonce refusals).
    pub code: Option<i64>,
}

impl ValidationError {
    /// Creates a refusal without a structured code.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// Creates a refusal with a structured code.
    pub fn with_code(code: i64, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code),
        }
    }
}

/// The nonce signature an emulator failure may carry.
///
/// When emulation aborts because the ledger runtime observed a stale
/// nonce, the failure reports the account state and the transaction nonce
/// so admission can re-raise the standard nonce refusal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonceMismatch {
    /// Transaction count recorded on the ledger account.
    pub state_tx_count: U256,
    /// Nonce carried by the rejected transaction.
    pub tx_nonce: U256,
}

/// Failure raised by the emulator collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EmulatorFailure {
    /// Emulator-reported failure text.
    pub message: String,
    /// Present when the failure is a ledger-side nonce rejection.
    pub nonce_mismatch: Option<NonceMismatch>,
}

impl EmulatorFailure {
    /// A plain emulator failure with no nonce signature.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            nonce_mismatch: None,
        }
    }

    /// An emulator failure caused by a ledger-side nonce rejection.
    pub fn nonce(message: impl Into<String>, state_tx_count: U256, tx_nonce: U256) -> Self {
        Self {
            message: message.into(),
            nonce_mismatch: Some(NonceMismatch {
                state_tx_count,
                tx_nonce,
            }),
        }
    }
}

/// Admission pipeline error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// The transaction violates an admission invariant.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Emulation failed for a reason other than a nonce rejection.
    #[error("emulation failed: {0}")]
    Emulation(EmulatorFailure),

    /// The ledger-state accessor failed.
    #[error("ledger state unavailable: {0}")]
    State(String),
}

impl AdmissionError {
    /// Returns the validation refusal, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}
