//! Drip issuance: encode, fetch nonce, build, sign, broadcast

use crate::abi::encode_drip_call;
use crate::config::IssuerSettings;
use crate::error::{FaucetError, FaucetResult};
use crate::rpc::EthRpc;
use drip_common::types::Address;
use drip_crypto::{LegacyTransaction, OperatorKey};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of one claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DripOutcome {
    /// The drip transaction was accepted into the pending pool
    Claimed(Address),
    /// The input is not a valid address; nothing was sent
    RejectedInput(String),
    /// Nonce lookup, signing or broadcast failed
    SubmissionFailed,
}

/// Issues `drip(recipient)` transactions from the operator account.
///
/// Holds no key and no nonce state between calls: each `issue_drip` reads the
/// current transaction count of the signing account and consumes the key it
/// was given.
pub struct DripIssuer {
    settings: IssuerSettings,
    rpc: Arc<dyn EthRpc>,
}

impl DripIssuer {
    pub fn new(settings: IssuerSettings, rpc: Arc<dyn EthRpc>) -> Self {
        Self { settings, rpc }
    }

    pub fn settings(&self) -> &IssuerSettings {
        &self.settings
    }

    /// Send one drip to `recipient`, signed by `operator`.
    ///
    /// Every failure after validation collapses into `SubmissionFailed`; the
    /// detail only goes to the log.
    pub async fn issue_drip(&self, recipient: Address, operator: OperatorKey) -> DripOutcome {
        match self.submit(&recipient, &operator).await {
            Ok(tx_hash) => {
                info!("Drip to {} broadcast, tx: {}", recipient, tx_hash);
                DripOutcome::Claimed(recipient)
            }
            Err(e) => {
                warn!("Drip to {} failed: {}", recipient, e);
                DripOutcome::SubmissionFailed
            }
        }
    }

    async fn submit(&self, recipient: &Address, operator: &OperatorKey) -> FaucetResult<String> {
        let data = encode_drip_call(recipient);

        // The counted account is the signing account
        let nonce = self.rpc.get_transaction_count(&operator.address()).await?;
        debug!("Operator {} nonce: {}", operator.address(), nonce);

        let tx = self.build_transaction(nonce, data);
        let signed = operator.sign_transaction(&tx)?;
        let expected_hash = signed.hash_hex();

        let tx_hash = self.rpc.send_raw_transaction(signed.raw()).await?;
        if !tx_hash.eq_ignore_ascii_case(&expected_hash) {
            return Err(FaucetError::Rpc(format!(
                "endpoint reported hash {} for transaction {}",
                tx_hash, expected_hash
            )));
        }

        Ok(tx_hash)
    }

    /// Legacy transaction calling the faucet contract with the given nonce
    pub fn build_transaction(&self, nonce: u64, data: Vec<u8>) -> LegacyTransaction {
        LegacyTransaction {
            nonce,
            gas_price: self.settings.gas_price,
            gas_limit: self.settings.gas_limit,
            to: self.settings.faucet_contract,
            value: 0,
            data,
            chain_id: self.settings.chain_id,
        }
    }
}
