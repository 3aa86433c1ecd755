//! # Transaction Precheck Pipeline
//!
//! `TxValidator` is constructed per transaction and gates it before it may
//! be queued for execution.
//!
//! ## Check Order (fail-fast)
//!
//! | # | Check | Refusal |
//! |---|-------|---------|
//! | 1 | Whitelist (execute / deploy permission) | "… is not allowed …" |
//! | 2 | Nonce vs. account transaction count | code -32002 |
//! | 3 | Gas bounds (u64 overflow, fee cap, price floor) | various |
//! | 4 | Chain id | "wrong chain id" |
//! | 5 | Call-data size (128 KiB - 1 KiB) | "transaction size is too big" |
//! | 6 | Sender balance covers gas * price + value | "insufficient funds …" |
//! | * | Emulation (external call) | propagated |
//! | 7 | Gas usage vs. effective limit | "gas limit reached" |
//! | 8 | Touched-account code sizes (9.5 MiB cap) | named address |
//! | 9 | Underpriced-without-chain-id policy | configuration refusal |
//!
//! The nonce/transaction-count comparison treats `2^64` as a reserved
//! overflow sentinel, never as a literal count.

use crate::config::AdmissionConfig;
use crate::domain::errors::{AdmissionError, EmulatorFailure, ValidationError, NONCE_ERROR_CODE};
use crate::domain::value_objects::PrecheckResult;
use crate::ports::outbound::{LedgerStateProvider, TransactionEmulator, WhitelistProvider};
use shared_types::{
    address_hex, Address, EmulationTrace, EvmTransaction, LedgerAccount, TxExecConfig, U256,
};
use tracing::warn;

/// The reserved `2^64` sentinel on nonce/transaction-count fields.
pub fn max_u64() -> U256 {
    U256::one() << 64
}

/// Maximum call-data length: 128 KiB minus 1 KiB of envelope headroom.
const MAX_TX_SIZE: usize = 128 * 1024 - 1024;

/// Maximum code size a touched account may request: 9.5 MiB.
const MAX_ACCOUNT_CODE_SIZE: u64 = (9 * 1024 + 512) * 1024;

/// Gas-price floor under which a no-chain-id transaction may still pass
/// when the policy flag permits it.
fn no_chainid_price_floor() -> U256 {
    U256::from(10u64).pow(U256::from(10u64))
}

/// Per-transaction admission validator.
///
/// Construction snapshots the sender's ledger account and derives the
/// effective gas limit; `precheck` then runs the pipeline above. The same
/// validator may be prechecked repeatedly against the snapshot it holds.
pub struct TxValidator<'a> {
    whitelist: &'a dyn WhitelistProvider,
    emulator: &'a dyn TransactionEmulator,
    config: &'a AdmissionConfig,
    tx: &'a EvmTransaction,
    sender: Address,
    account: Option<LedgerAccount>,
    deployed_contract: Option<Address>,
    min_gas_price: U256,
    estimated_gas: U256,
    tx_gas_limit: U256,
}

impl<'a> TxValidator<'a> {
    /// Builds a validator for one transaction, reading the sender account
    /// from the ledger.
    pub fn new(
        state: &'a dyn LedgerStateProvider,
        whitelist: &'a dyn WhitelistProvider,
        emulator: &'a dyn TransactionEmulator,
        config: &'a AdmissionConfig,
        tx: &'a EvmTransaction,
        min_gas_price: U256,
    ) -> Result<Self, AdmissionError> {
        let sender = tx.sender();
        let account = state.account_info(&sender)?;

        let mut validator = Self {
            whitelist,
            emulator,
            config,
            tx,
            sender,
            account,
            deployed_contract: tx.contract(),
            min_gas_price,
            estimated_gas: U256::zero(),
            tx_gas_limit: tx.gas_limit,
        };
        validator.apply_no_chainid_gas_multiplier();
        Ok(validator)
    }

    /// Effective gas limit after the no-chain-id multiplier, if applied.
    pub fn tx_gas_limit(&self) -> U256 {
        self.tx_gas_limit
    }

    /// Raises the provisional gas limit for no-chain-id transactions that
    /// carry call data, capped below the `2^64` sentinel.
    fn apply_no_chainid_gas_multiplier(&mut self) {
        if self.tx.has_chain_id() || !self.config.allow_underpriced_tx_without_chainid {
            return;
        }
        if self.tx.call_data.is_empty() {
            return;
        }
        let multiplier = U256::from(self.config.no_chainid_gas_limit_multiplier);
        if let Some(raised) = self.tx.gas_limit.checked_mul(multiplier) {
            if raised < max_u64() {
                self.tx_gas_limit = raised;
            }
        }
    }

    /// Runs the full admission pipeline.
    pub fn precheck(&mut self) -> Result<PrecheckResult, AdmissionError> {
        self.prevalidate_tx()?;

        let emulation = match self.emulator.emulate(self.tx) {
            Ok(trace) => trace,
            Err(failure) => return Err(self.emulator_error(failure)),
        };
        self.prevalidate_emulation(&emulation)?;

        let is_underpriced_without_chainid = self.is_underpriced_tx_without_chainid();
        Ok(PrecheckResult {
            emulation,
            is_underpriced_without_chainid,
            exec_config: TxExecConfig {
                gas_limit: self.tx_gas_limit,
                is_underpriced_without_chainid,
            },
        })
    }

    /// True when the transaction has no chain id and is underpriced
    /// relative to the floor or to the emulated gas estimate.
    pub fn is_underpriced_tx_without_chainid(&self) -> bool {
        if self.tx.has_chain_id() {
            return false;
        }
        self.tx.gas_price < self.min_gas_price || self.tx.gas_limit < self.estimated_gas
    }

    fn prevalidate_tx(&self) -> Result<(), AdmissionError> {
        self.prevalidate_whitelist()?;
        self.prevalidate_tx_nonce()?;
        self.prevalidate_tx_gas()?;
        self.prevalidate_tx_chain_id()?;
        self.prevalidate_tx_size()?;
        self.prevalidate_sender_balance()
    }

    fn prevalidate_emulation(&mut self, trace: &EmulationTrace) -> Result<(), AdmissionError> {
        self.prevalidate_gas_usage(trace)?;
        Self::prevalidate_account_sizes(trace)?;
        self.prevalidate_underpriced_tx_without_chainid()
    }

    /// Re-raises emulator failures carrying a nonce signature as the
    /// standard nonce refusal; everything else propagates as-is.
    fn emulator_error(&self, failure: EmulatorFailure) -> AdmissionError {
        match failure.nonce_mismatch {
            Some(mismatch) => self
                .nonce_error(mismatch.state_tx_count, mismatch.tx_nonce)
                .into(),
            None => AdmissionError::Emulation(failure),
        }
    }

    fn prevalidate_whitelist(&self) -> Result<(), AdmissionError> {
        if !self.whitelist.has_client_permission(&self.sender)? {
            let sender = address_hex(&self.sender);
            warn!(sender = %sender, "sender account is not allowed to execute transactions");
            return Err(ValidationError::new(format!(
                "sender account {sender} is not allowed to execute transactions"
            ))
            .into());
        }

        if let Some(contract) = &self.deployed_contract {
            if !self.whitelist.has_contract_permission(contract)? {
                let contract = address_hex(contract);
                warn!(contract = %contract, "contract account is not allowed for deployment");
                return Err(ValidationError::new(format!(
                    "contract account {contract} is not allowed for deployment"
                ))
                .into());
            }
        }
        Ok(())
    }

    fn prevalidate_tx_nonce(&self) -> Result<(), AdmissionError> {
        let Some(account) = &self.account else {
            return Ok(());
        };

        let tx_nonce = self.tx.nonce;
        if account.tx_count != max_u64() && tx_nonce != max_u64() && tx_nonce == account.tx_count {
            return Ok(());
        }

        Err(self.nonce_error(account.tx_count, tx_nonce).into())
    }

    fn nonce_error(&self, account_tx_count: U256, tx_nonce: U256) -> ValidationError {
        let message = if account_tx_count == max_u64() || tx_nonce == max_u64() {
            "nonce has max value"
        } else if account_tx_count > tx_nonce {
            "nonce too low"
        } else {
            "nonce too high"
        };

        ValidationError::with_code(
            NONCE_ERROR_CODE,
            format!(
                "{message}: address {}, tx: {tx_nonce} state: {account_tx_count}",
                address_hex(&self.sender)
            ),
        )
    }

    fn prevalidate_tx_gas(&self) -> Result<(), AdmissionError> {
        if self.tx_gas_limit >= max_u64() {
            return Err(ValidationError::new("gas uint64 overflow").into());
        }
        if self.tx_gas_limit.checked_mul(self.tx.gas_price).is_none() {
            return Err(ValidationError::new("max fee per gas higher than 2^256-1").into());
        }
        if self.tx.gas_price >= self.min_gas_price {
            return Ok(());
        }

        if self.config.allow_underpriced_tx_without_chainid
            && !self.tx.has_chain_id()
            && self.tx.gas_price >= no_chainid_price_floor()
        {
            return Ok(());
        }

        Err(ValidationError::new(format!(
            "transaction underpriced: have {} want {}",
            self.tx.gas_price, self.min_gas_price
        ))
        .into())
    }

    fn prevalidate_tx_chain_id(&self) -> Result<(), AdmissionError> {
        match self.tx.chain_id {
            None => Ok(()),
            Some(id) if id == self.config.chain_id => Ok(()),
            Some(_) => Err(ValidationError::new("wrong chain id").into()),
        }
    }

    fn prevalidate_tx_size(&self) -> Result<(), AdmissionError> {
        if self.tx.call_data.len() > MAX_TX_SIZE {
            return Err(ValidationError::new("transaction size is too big").into());
        }
        Ok(())
    }

    fn prevalidate_sender_balance(&self) -> Result<(), AdmissionError> {
        let balance = self
            .account
            .as_ref()
            .map(|account| account.balance)
            .unwrap_or_else(U256::zero);

        let required = self
            .tx
            .gas_price
            .saturating_mul(self.tx_gas_limit)
            .saturating_add(self.tx.value);

        if required <= balance {
            return Ok(());
        }

        let message = if self.tx.call_data.is_empty() {
            "insufficient funds for transfer"
        } else {
            "insufficient funds for gas * price + value"
        };

        Err(ValidationError::new(format!(
            "{message}: address {} have {balance} want {required}",
            address_hex(&self.sender)
        ))
        .into())
    }

    fn prevalidate_gas_usage(&mut self, trace: &EmulationTrace) -> Result<(), AdmissionError> {
        self.estimated_gas = trace.estimated_gas;

        if self.estimated_gas <= self.tx_gas_limit {
            return Ok(());
        }

        Err(ValidationError::new(format!(
            "gas limit reached: have {} want {}",
            self.tx_gas_limit, self.estimated_gas
        ))
        .into())
    }

    fn prevalidate_account_sizes(trace: &EmulationTrace) -> Result<(), AdmissionError> {
        for account in &trace.accounts {
            let (Some(address), Some(code_size)) = (&account.address, account.code_size) else {
                continue;
            };
            if code_size == 0 {
                continue;
            }
            if code_size > MAX_ACCOUNT_CODE_SIZE {
                return Err(ValidationError::new(format!(
                    "contract {} requests a size increase to more than 9.5Mb",
                    address_hex(address)
                ))
                .into());
            }
        }
        Ok(())
    }

    fn prevalidate_underpriced_tx_without_chainid(&self) -> Result<(), AdmissionError> {
        if !self.is_underpriced_tx_without_chainid() {
            return Ok(());
        }
        if self.config.allow_underpriced_tx_without_chainid {
            return Ok(());
        }

        Err(ValidationError::new(
            "proxy configuration doesn't allow underpriced transaction without chain-id",
        )
        .into())
    }
}
