//! Configuration for the admission subsystem.
//!
//! Chain parameters are an explicit struct constructed once at process
//! start and passed by reference into each validator. Core logic performs
//! no environment lookups.

use serde::{Deserialize, Serialize};

/// Admission configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdmissionConfig {
    /// Chain id the proxy serves; transactions carrying a different id are
    /// rejected.
    pub chain_id: u64,
    /// Gas-limit multiplier provisionally applied to no-chain-id
    /// transactions that carry call data.
    pub no_chainid_gas_limit_multiplier: u64,
    /// Permit underpriced transactions without a chain id (legacy wallets).
    pub allow_underpriced_tx_without_chainid: bool,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            chain_id: 111,
            no_chainid_gas_limit_multiplier: 1000,
            allow_underpriced_tx_without_chainid: false,
        }
    }
}

impl AdmissionConfig {
    /// Reads the configuration from the environment. Call once at the
    /// process boundary; everything downstream receives the struct.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            chain_id: env_u64("CHAIN_ID", defaults.chain_id),
            no_chainid_gas_limit_multiplier: env_u64(
                "NO_CHAINID_GAS_LIMIT_MULTIPLIER",
                defaults.no_chainid_gas_limit_multiplier,
            ),
            allow_underpriced_tx_without_chainid: env_yes(
                "ALLOW_UNDERPRICED_TX_WITHOUT_CHAINID",
            ),
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

fn env_yes(name: &str) -> bool {
    std::env::var(name).map(|value| value == "YES").unwrap_or(false)
}
