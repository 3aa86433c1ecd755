//! # Shared Types Crate
//!
//! Domain entities shared across the proxy subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type that crosses a subsystem
//!   boundary (admission → scheduler → executor pool) is defined here.
//! - **Wide integers wherever gas lives**: nonce, transaction count, gas
//!   price and gas limit are `U256`. The ledger runtime uses `2^64` as a
//!   reserved overflow sentinel on nonce/transaction-count fields, which a
//!   plain `u64` cannot represent.

pub mod entities;

pub use entities::*;
