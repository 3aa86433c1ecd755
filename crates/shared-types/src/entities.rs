//! # Core Domain Entities
//!
//! Defines the entities flowing through the proxy pipeline:
//!
//! - **Transaction**: `EvmTransaction`, an externally signed,
//!   Ethereum-style transaction.
//! - **Ledger state**: `LedgerAccount`, the account snapshot the admission
//!   pipeline validates against.
//! - **Emulation**: `EmulationTrace` and `EmulatedAccount`, the dry-run
//!   result produced before a transaction may be queued.
//! - **Execution**: `TxExecConfig`, parameters derived during admission
//!   and carried forward to the executor pool.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

/// A 32-byte transaction hash.
pub type Hash = [u8; 32];

/// A 65-byte ECDSA signature (r, s, v).
pub type Signature = [u8; 65];

/// A 20-byte Ethereum-style address.
pub type Address = [u8; 20];

/// Renders an address as a 0x-prefixed hex string.
pub fn address_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

/// Renders a hash as a 0x-prefixed hex string.
pub fn hash_hex(hash: &Hash) -> String {
    format!("0x{}", hex::encode(hash))
}

/// An externally signed, Ethereum-style transaction.
///
/// The payload is opaque to the scheduler; only the admission pipeline
/// inspects its fields. Gas fields are `U256` because the wire format
/// carries arbitrary-width integers and the bound checks themselves
/// (`< 2^64`, `< 2^256`) are part of admission, not of decoding.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvmTransaction {
    /// Sender address recovered from the signature.
    pub from: Address,
    /// Recipient address (`None` for contract deployment).
    pub to: Option<Address>,
    /// Sender's nonce.
    pub nonce: U256,
    /// Gas price in base units.
    pub gas_price: U256,
    /// Gas limit as carried by the transaction.
    pub gas_limit: U256,
    /// Transferred value in base units.
    pub value: U256,
    /// Call data (contract input, empty for plain transfers).
    pub call_data: Vec<u8>,
    /// EIP-155 chain id, absent for pre-155 transactions.
    pub chain_id: Option<u64>,
    /// ECDSA signature (r, s, v).
    #[serde_as(as = "Bytes")]
    pub signature: Signature,
}

impl EvmTransaction {
    /// Returns true if the transaction carries an EIP-155 chain id.
    pub fn has_chain_id(&self) -> bool {
        self.chain_id.is_some()
    }

    /// Returns the sender address.
    pub fn sender(&self) -> Address {
        self.from
    }

    /// Returns the address of the contract this transaction deploys,
    /// or `None` when it is a call/transfer.
    ///
    /// The deploy address is derived from `(sender, nonce)`, so it is
    /// stable for a given signed payload.
    pub fn contract(&self) -> Option<Address> {
        if self.to.is_some() {
            return None;
        }
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(self.from);
        hasher.update(u256_bytes(&self.nonce));
        let digest = hasher.finalize();
        let mut address = [0u8; 20];
        address.copy_from_slice(&digest[12..32]);
        Some(address)
    }

    /// Computes the hash of the signed transaction.
    pub fn hash_signed(&self) -> Hash {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(self.from);
        if let Some(to) = &self.to {
            hasher.update(to);
        }
        hasher.update(u256_bytes(&self.nonce));
        hasher.update(u256_bytes(&self.gas_price));
        hasher.update(u256_bytes(&self.gas_limit));
        hasher.update(u256_bytes(&self.value));
        hasher.update(&self.call_data);
        if let Some(chain_id) = self.chain_id {
            hasher.update(chain_id.to_be_bytes());
        }
        hasher.update(self.signature);
        hasher.finalize().into()
    }

    /// 0x-prefixed hex rendering of the signed-transaction hash.
    pub fn tx_hash_hex(&self) -> String {
        hash_hex(&self.hash_signed())
    }
}

fn u256_bytes(value: &U256) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    bytes
}

/// Snapshot of a ledger account as seen by the admission pipeline.
///
/// The state accessor returns `Option<LedgerAccount>`; `None` means the
/// account does not exist on the foreign ledger yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerAccount {
    /// Spendable balance in base units.
    pub balance: U256,
    /// Number of transactions already executed for this account.
    /// May hold the reserved `2^64` overflow sentinel.
    pub tx_count: U256,
    /// True when the account is backed by deployed code.
    pub code_account: bool,
}

/// One account touched during emulation.
///
/// The emulator reports fields best-effort; entries missing either the
/// address or the code size are skipped by the size check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmulatedAccount {
    /// Address of the touched account, when resolved.
    pub address: Option<Address>,
    /// Post-execution code size in bytes, when reported.
    pub code_size: Option<u64>,
}

/// Result of dry-running a transaction against foreign-ledger state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmulationTrace {
    /// Accounts touched by the emulated execution.
    pub accounts: Vec<EmulatedAccount>,
    /// Gas-usage estimate for the emulated execution.
    pub estimated_gas: U256,
}

/// Execution parameters derived during admission and consumed by the
/// executor pool. Not re-validated downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxExecConfig {
    /// Effective gas limit, possibly raised by the no-chain-id multiplier.
    pub gas_limit: U256,
    /// The transaction was admitted through the underpriced, no-chain-id
    /// exception. Consumed downstream for fee accounting.
    pub is_underpriced_without_chainid: bool,
}
