//! Faucet service: validation in front of the issuer

use crate::config::FaucetConfig;
use crate::error::FaucetResult;
use crate::issuer::{DripIssuer, DripOutcome};
use crate::rpc::EthRpc;
use drip_common::address;
use drip_common::types::Address;
use drip_crypto::OperatorKey;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Faucet service
pub struct ClaimService {
    issuer: DripIssuer,
    operator_credential: String,
    operator_address: Address,
}

impl ClaimService {
    /// Validate the configuration and wire the issuer to `rpc`.
    pub fn new(config: &FaucetConfig, rpc: Arc<dyn EthRpc>) -> FaucetResult<Self> {
        let settings = config.issuer_settings()?;
        let operator_address = config.operator_key()?.address();

        info!("Operator address: {}", operator_address);
        info!("Faucet contract: {}", settings.faucet_contract);

        Ok(Self {
            issuer: DripIssuer::new(settings, rpc),
            operator_credential: config.operator_private_key.clone(),
            operator_address,
        })
    }

    /// Validate `input` and, if it is an address, issue a drip to it.
    ///
    /// Rejected input never reaches the network.
    pub async fn claim(&self, input: &str) -> DripOutcome {
        let recipient = match address::validate(input) {
            Ok(recipient) => recipient,
            Err(e) => {
                info!("Rejected claim for {:?}: {}", input, e);
                return DripOutcome::RejectedInput(input.to_string());
            }
        };

        // A fresh key per claim, dropped when the issuer is done with it
        let operator = match OperatorKey::from_private_key_hex(&self.operator_credential) {
            Ok(key) => key,
            Err(e) => {
                warn!("Operator key unavailable: {}", e);
                return DripOutcome::SubmissionFailed;
            }
        };

        self.issuer.issue_drip(recipient, operator).await
    }

    pub fn operator_address(&self) -> Address {
        self.operator_address
    }

    /// Get faucet status
    pub fn status(&self) -> FaucetStatus {
        let settings = self.issuer.settings();
        FaucetStatus {
            operator: self.operator_address,
            faucet_contract: settings.faucet_contract,
            chain_id: settings.chain_id,
            gas_price: settings.gas_price.to_string(),
            gas_limit: settings.gas_limit,
        }
    }
}

/// Faucet status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaucetStatus {
    pub operator: Address,
    pub faucet_contract: Address,
    pub chain_id: u64,
    /// In wei, as a decimal string
    pub gas_price: String,
    pub gas_limit: u64,
}
