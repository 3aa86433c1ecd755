//! Ports of the admission subsystem.

pub mod outbound;

pub use outbound::{LedgerStateProvider, TransactionEmulator, WhitelistProvider};
