//! # Admission Flow
//!
//! Drives `TxValidator` through in-memory port implementations and checks
//! that admitted transactions carry the execution parameters the scheduler
//! consumes downstream.

#[cfg(test)]
mod tests {
    use lp_01_admission::config::AdmissionConfig;
    use lp_01_admission::domain::errors::{AdmissionError, EmulatorFailure, NONCE_ERROR_CODE};
    use lp_01_admission::domain::validator::{max_u64, TxValidator};
    use lp_01_admission::ports::outbound::{
        LedgerStateProvider, TransactionEmulator, WhitelistProvider,
    };
    use lp_02_scheduler::PendingRequest;
    use shared_types::{Address, EmulationTrace, EvmTransaction, LedgerAccount, U256};
    use std::collections::HashMap;

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    const SENDER: Address = [0xAA; 20];

    struct InMemoryLedger {
        accounts: HashMap<Address, LedgerAccount>,
    }

    impl InMemoryLedger {
        fn with_funded_sender(tx_count: u64) -> Self {
            let mut accounts = HashMap::new();
            accounts.insert(
                SENDER,
                LedgerAccount {
                    balance: U256::from(10u64).pow(U256::from(20u64)),
                    tx_count: U256::from(tx_count),
                    code_account: false,
                },
            );
            Self { accounts }
        }
    }

    impl LedgerStateProvider for InMemoryLedger {
        fn account_info(
            &self,
            address: &Address,
        ) -> Result<Option<LedgerAccount>, AdmissionError> {
            Ok(self.accounts.get(address).cloned())
        }
    }

    struct OpenWhitelist;

    impl WhitelistProvider for OpenWhitelist {
        fn has_client_permission(&self, _address: &Address) -> Result<bool, AdmissionError> {
            Ok(true)
        }

        fn has_contract_permission(&self, _address: &Address) -> Result<bool, AdmissionError> {
            Ok(true)
        }
    }

    struct FixedEmulator {
        estimated_gas: u64,
    }

    impl TransactionEmulator for FixedEmulator {
        fn emulate(&self, _tx: &EvmTransaction) -> Result<EmulationTrace, EmulatorFailure> {
            Ok(EmulationTrace {
                accounts: vec![],
                estimated_gas: U256::from(self.estimated_gas),
            })
        }
    }

    fn signed_tx(nonce: u64, gas_price_gwei: u64) -> EvmTransaction {
        EvmTransaction {
            from: SENDER,
            to: Some([0xBB; 20]),
            nonce: U256::from(nonce),
            gas_price: U256::from(gas_price_gwei) * U256::from(1_000_000_000u64),
            gas_limit: U256::from(30_000u64),
            value: U256::from(1_000u64),
            call_data: vec![],
            chain_id: Some(111),
            signature: [0xC1; 65],
        }
    }

    // =========================================================================
    // FLOWS
    // =========================================================================

    #[test]
    fn test_admitted_tx_becomes_pending_request() -> anyhow::Result<()> {
        let ledger = InMemoryLedger::with_funded_sender(7);
        let whitelist = OpenWhitelist;
        let emulator = FixedEmulator {
            estimated_gas: 21_000,
        };
        let config = AdmissionConfig::default();
        let tx = signed_tx(7, 2);

        let result = TxValidator::new(
            &ledger,
            &whitelist,
            &emulator,
            &config,
            &tx,
            U256::from(1_000_000_000u64),
        )?
        .precheck()?;

        let request = PendingRequest::new(tx.clone(), result.exec_config, result.emulation);
        assert_eq!(request.gas_price(), tx.gas_price);
        assert_eq!(request.exec_config.gas_limit, tx.gas_limit);
        assert_eq!(request.emulation.estimated_gas, U256::from(21_000u64));
        assert!(!request.exec_config.is_underpriced_without_chainid);
        Ok(())
    }

    #[test]
    fn test_stale_nonce_refused_with_structured_code() {
        let ledger = InMemoryLedger::with_funded_sender(9);
        let whitelist = OpenWhitelist;
        let emulator = FixedEmulator {
            estimated_gas: 21_000,
        };
        let config = AdmissionConfig::default();
        let tx = signed_tx(7, 2);

        let err = TxValidator::new(
            &ledger,
            &whitelist,
            &emulator,
            &config,
            &tx,
            U256::from(1_000_000_000u64),
        )
        .unwrap()
        .precheck()
        .unwrap_err();

        let refusal = err.as_validation().expect("validation refusal");
        assert_eq!(refusal.code, Some(NONCE_ERROR_CODE));
        assert!(refusal.message.contains("nonce too low"));
        assert!(refusal.message.contains("tx: 7 state: 9"));
    }

    #[test]
    fn test_sentinel_tx_count_never_admits() {
        let mut ledger = InMemoryLedger::with_funded_sender(0);
        ledger.accounts.get_mut(&SENDER).unwrap().tx_count = max_u64();
        let whitelist = OpenWhitelist;
        let emulator = FixedEmulator {
            estimated_gas: 21_000,
        };
        let config = AdmissionConfig::default();

        let mut tx = signed_tx(0, 2);
        tx.nonce = max_u64();

        let err = TxValidator::new(
            &ledger,
            &whitelist,
            &emulator,
            &config,
            &tx,
            U256::from(1_000_000_000u64),
        )
        .unwrap()
        .precheck()
        .unwrap_err();

        assert!(err.to_string().contains("nonce has max value"));
    }

    #[test]
    fn test_no_chainid_admission_raises_gas_limit() {
        let ledger = InMemoryLedger::with_funded_sender(7);
        let whitelist = OpenWhitelist;
        let emulator = FixedEmulator {
            estimated_gas: 21_000,
        };
        let config = AdmissionConfig {
            allow_underpriced_tx_without_chainid: true,
            no_chainid_gas_limit_multiplier: 10,
            ..AdmissionConfig::default()
        };

        let mut tx = signed_tx(7, 0);
        tx.chain_id = None;
        tx.gas_price = U256::from(10u64).pow(U256::from(10u64));
        tx.call_data = vec![0x60, 0x80];

        let result = TxValidator::new(
            &ledger,
            &whitelist,
            &emulator,
            &config,
            &tx,
            U256::from(10u64).pow(U256::from(12u64)),
        )
        .unwrap()
        .precheck()
        .unwrap();

        assert!(result.is_underpriced_without_chainid);
        assert_eq!(result.exec_config.gas_limit, U256::from(300_000u64));
    }
}
