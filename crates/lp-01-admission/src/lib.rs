//! # Transaction Admission Subsystem
//!
//! Decides, before a transaction enters the scheduling queue, whether it is
//! eligible for execution against the foreign ledger, and computes the
//! execution parameters the scheduler carries forward.
//!
//! ## Precheck Pipeline
//!
//! `TxValidator::precheck` runs a fail-fast sequence re-deriving the
//! Ethereum-style transaction invariants purely from foreign-ledger account
//! state and an emulated execution trace:
//!
//! ```text
//! whitelist → nonce → gas bounds → chain id → size → balance
//!     │
//!     └──→ emulate ──→ gas usage → account sizes → no-chain-id policy
//! ```
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ports/outbound.rs  - LedgerStateProvider, WhitelistProvider,
//!                      TransactionEmulator traits
//! domain/validator.rs - TxValidator precheck pipeline
//! domain/errors.rs    - AdmissionError, ValidationError
//! config.rs           - AdmissionConfig (built once at process start)
//! ```
//!
//! ## Error Contract
//!
//! Every admission refusal is a `ValidationError` with a human-readable
//! message; nonce refusals additionally carry the fixed code `-32002`.
//! Failures of the external collaborators (ledger reads, emulation) get
//! their own `AdmissionError` variants and surface to the caller, who must
//! decide not to enqueue.

pub mod config;
pub mod domain;
pub mod ports;

pub use config::AdmissionConfig;
pub use domain::*;
pub use ports::*;
