//! In-memory JSON-RPC endpoint shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use drip_common::types::Address;
use drip_crypto::SignedTransaction;
use drip_faucet::{EthRpc, FaucetConfig, FaucetError, FaucetResult};
use std::sync::Mutex;

pub const OPERATOR_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const OPERATOR_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const FAUCET_CONTRACT: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
pub const CHAIN_ID: u64 = 78787;

pub fn test_config() -> FaucetConfig {
    FaucetConfig {
        operator_private_key: OPERATOR_KEY.to_string(),
        operator_address: Some(OPERATOR_ADDRESS.to_string()),
        faucet_contract: FAUCET_CONTRACT.to_string(),
        chain_id: CHAIN_ID,
        ..Default::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitBehavior {
    Accept,
    Reject,
    WrongHash,
}

/// Records every call; answers with a fixed nonce
pub struct StubRpc {
    pub nonce: u64,
    pub fail_nonce: bool,
    pub submit: SubmitBehavior,
    pub nonce_queries: Mutex<Vec<Address>>,
    pub submitted: Mutex<Vec<Vec<u8>>>,
}

impl StubRpc {
    pub fn accepting(nonce: u64) -> Self {
        Self {
            nonce,
            fail_nonce: false,
            submit: SubmitBehavior::Accept,
            nonce_queries: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting_submit(nonce: u64) -> Self {
        Self {
            submit: SubmitBehavior::Reject,
            ..Self::accepting(nonce)
        }
    }

    pub fn nonce_query_count(&self) -> usize {
        self.nonce_queries.lock().unwrap().len()
    }

    pub fn submitted(&self) -> Vec<Vec<u8>> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl EthRpc for StubRpc {
    async fn chain_id(&self) -> FaucetResult<u64> {
        Ok(CHAIN_ID)
    }

    async fn get_transaction_count(&self, address: &Address) -> FaucetResult<u64> {
        self.nonce_queries.lock().unwrap().push(*address);
        if self.fail_nonce {
            return Err(FaucetError::Rpc("connection refused".to_string()));
        }
        Ok(self.nonce)
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> FaucetResult<String> {
        match self.submit {
            SubmitBehavior::Reject => Err(FaucetError::Rpc(
                "insufficient funds for gas * price + value".to_string(),
            )),
            SubmitBehavior::WrongHash => {
                self.submitted.lock().unwrap().push(raw.to_vec());
                Ok(format!("0x{}", "00".repeat(32)))
            }
            SubmitBehavior::Accept => {
                self.submitted.lock().unwrap().push(raw.to_vec());
                Ok(SignedTransaction::new(raw.to_vec()).hash_hex())
            }
        }
    }
}
