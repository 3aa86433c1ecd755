//! Outbound (driven) ports of the admission subsystem.
//!
//! These traits define the external collaborators the precheck pipeline
//! consults: the foreign-ledger account state, the whitelist bookkeeping
//! service, and the execution emulator. All three may block on I/O in
//! production; the pipeline calls them synchronously, in fixed order.

use crate::domain::errors::{AdmissionError, EmulatorFailure};
use shared_types::{Address, EmulationTrace, EvmTransaction, LedgerAccount};

/// Read access to foreign-ledger account state.
pub trait LedgerStateProvider: Send + Sync {
    /// Returns the account snapshot, or `None` when the account does not
    /// exist on the ledger yet.
    fn account_info(&self, address: &Address) -> Result<Option<LedgerAccount>, AdmissionError>;
}

/// Permission checks against the operator's whitelist service.
pub trait WhitelistProvider: Send + Sync {
    /// True when the address may execute transactions through the proxy.
    fn has_client_permission(&self, address: &Address) -> Result<bool, AdmissionError>;

    /// True when the address may be used as a deployment target.
    fn has_contract_permission(&self, address: &Address) -> Result<bool, AdmissionError>;
}

/// Dry-runs a transaction against foreign-ledger state without committing.
pub trait TransactionEmulator: Send + Sync {
    /// Produces the execution trace, or the failure the ledger runtime
    /// raised. Nonce rejections carry their signature on the failure so
    /// admission can re-raise the standard nonce refusal.
    fn emulate(&self, tx: &EvmTransaction) -> Result<EmulationTrace, EmulatorFailure>;
}

/// Mock ledger state for testing.
#[cfg(test)]
pub struct MockLedgerState {
    accounts: std::collections::HashMap<Address, LedgerAccount>,
}

#[cfg(test)]
impl MockLedgerState {
    pub fn new() -> Self {
        Self {
            accounts: std::collections::HashMap::new(),
        }
    }

    pub fn with_account(mut self, address: Address, account: LedgerAccount) -> Self {
        self.accounts.insert(address, account);
        self
    }
}

#[cfg(test)]
impl LedgerStateProvider for MockLedgerState {
    fn account_info(&self, address: &Address) -> Result<Option<LedgerAccount>, AdmissionError> {
        Ok(self.accounts.get(address).cloned())
    }
}

/// Mock whitelist for testing. Allows everything unless told otherwise.
#[cfg(test)]
pub struct MockWhitelist {
    denied_clients: std::collections::HashSet<Address>,
    denied_contracts: std::collections::HashSet<Address>,
}

#[cfg(test)]
impl MockWhitelist {
    pub fn allow_all() -> Self {
        Self {
            denied_clients: std::collections::HashSet::new(),
            denied_contracts: std::collections::HashSet::new(),
        }
    }

    pub fn deny_client(mut self, address: Address) -> Self {
        self.denied_clients.insert(address);
        self
    }

    pub fn deny_contract(mut self, address: Address) -> Self {
        self.denied_contracts.insert(address);
        self
    }
}

#[cfg(test)]
impl WhitelistProvider for MockWhitelist {
    fn has_client_permission(&self, address: &Address) -> Result<bool, AdmissionError> {
        Ok(!self.denied_clients.contains(address))
    }

    fn has_contract_permission(&self, address: &Address) -> Result<bool, AdmissionError> {
        Ok(!self.denied_contracts.contains(address))
    }
}

/// Mock emulator returning a scripted result.
#[cfg(test)]
pub struct MockEmulator {
    result: Result<EmulationTrace, EmulatorFailure>,
}

#[cfg(test)]
impl MockEmulator {
    pub fn returning(trace: EmulationTrace) -> Self {
        Self { result: Ok(trace) }
    }

    pub fn failing(failure: EmulatorFailure) -> Self {
        Self {
            result: Err(failure),
        }
    }
}

#[cfg(test)]
impl TransactionEmulator for MockEmulator {
    fn emulate(&self, _tx: &EvmTransaction) -> Result<EmulationTrace, EmulatorFailure> {
        self.result.clone()
    }
}
