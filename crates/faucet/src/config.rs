//! Faucet configuration

use crate::error::{FaucetError, FaucetResult};
use drip_common::types::Address;
use drip_common::utils::logging::LoggingConfig;
use drip_crypto::{OperatorKey, MAX_CHAIN_ID};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Faucet service configuration.
///
/// Loaded once at startup (file, then `FAUCET_*` environment variables, then
/// CLI flags) and handed to the service; nothing reads the environment after
/// that.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FaucetConfig {
    /// Server address
    pub server_addr: String,

    /// JSON-RPC endpoint of the network
    pub rpc_url: String,

    /// Chain id the endpoint must report; bound into every signature
    pub chain_id: u64,

    /// Operator account private key (hex)
    pub operator_private_key: String,

    /// Expected operator address; must match the key when set
    pub operator_address: Option<String>,

    /// Address of the faucet contract exposing `drip(address)`
    pub faucet_contract: String,

    /// Gas price to use (in wei)
    pub gas_price: u64,

    /// Gas limit for drip transactions
    pub gas_limit: u64,

    /// Timeout for a single RPC request (seconds)
    pub rpc_timeout_secs: u64,

    /// Enable CORS
    pub cors_enabled: bool,

    pub logging: LoggingConfig,
}

impl Default for FaucetConfig {
    fn default() -> Self {
        Self {
            server_addr: "0.0.0.0:3000".to_string(),
            rpc_url: "https://blockchain.revenuecapital.io".to_string(),
            chain_id: 78787,
            operator_private_key: String::new(),
            operator_address: None,
            faucet_contract: String::new(),
            gas_price: 5_000_000_000, // 5 Gwei
            gas_limit: 500_000,
            rpc_timeout_secs: 30,
            cors_enabled: true,
            logging: LoggingConfig::default(),
        }
    }
}

impl fmt::Debug for FaucetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaucetConfig")
            .field("server_addr", &self.server_addr)
            .field("rpc_url", &self.rpc_url)
            .field("chain_id", &self.chain_id)
            .field("operator_private_key", &"<redacted>")
            .field("operator_address", &self.operator_address)
            .field("faucet_contract", &self.faucet_contract)
            .field("gas_price", &self.gas_price)
            .field("gas_limit", &self.gas_limit)
            .field("rpc_timeout_secs", &self.rpc_timeout_secs)
            .field("cors_enabled", &self.cors_enabled)
            .field("logging", &self.logging)
            .finish()
    }
}

/// Static transaction parameters, validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerSettings {
    pub faucet_contract: Address,
    pub chain_id: u64,
    pub gas_price: u64,
    pub gas_limit: u64,
}

impl FaucetConfig {
    /// Defaults overridden by the process environment
    pub fn from_env() -> FaucetResult<Self> {
        let mut config = Self::default();
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Override fields from `FAUCET_*` variables resolved through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> FaucetResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("FAUCET_SERVER_ADDR") {
            self.server_addr = addr;
        }

        if let Some(rpc_url) = lookup("FAUCET_RPC_URL") {
            self.rpc_url = rpc_url;
        }

        if let Some(chain_id) = lookup("FAUCET_CHAIN_ID") {
            self.chain_id = parse_var("FAUCET_CHAIN_ID", &chain_id)?;
        }

        if let Some(key) = lookup("FAUCET_OPERATOR_PRIVATE_KEY") {
            self.operator_private_key = key;
        }

        if let Some(operator) = lookup("FAUCET_OPERATOR_ADDRESS") {
            self.operator_address = Some(operator);
        }

        if let Some(contract) = lookup("FAUCET_CONTRACT_ADDRESS") {
            self.faucet_contract = contract;
        }

        if let Some(gas_price) = lookup("FAUCET_GAS_PRICE") {
            self.gas_price = parse_var("FAUCET_GAS_PRICE", &gas_price)?;
        }

        if let Some(gas_limit) = lookup("FAUCET_GAS_LIMIT") {
            self.gas_limit = parse_var("FAUCET_GAS_LIMIT", &gas_limit)?;
        }

        if let Some(timeout) = lookup("FAUCET_RPC_TIMEOUT") {
            self.rpc_timeout_secs = parse_var("FAUCET_RPC_TIMEOUT", &timeout)?;
        }

        if let Some(enabled) = lookup("FAUCET_CORS_ENABLED") {
            self.cors_enabled = enabled.to_lowercase() == "true";
        }

        if let Some(level) = lookup("FAUCET_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(format) = lookup("FAUCET_LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }

    /// Validate the static transaction parameters.
    pub fn issuer_settings(&self) -> FaucetResult<IssuerSettings> {
        if self.faucet_contract.is_empty() {
            return Err(FaucetError::Config("faucet contract address is not set".to_string()));
        }
        let faucet_contract = Address::from_str(&self.faucet_contract).map_err(|e| {
            FaucetError::Config(format!("faucet contract address '{}': {}", self.faucet_contract, e))
        })?;

        if self.gas_limit == 0 {
            return Err(FaucetError::Config("gas limit must be positive".to_string()));
        }

        if self.chain_id == 0 || self.chain_id > MAX_CHAIN_ID {
            return Err(FaucetError::Config(format!(
                "chain id {} is outside 1..={}",
                self.chain_id, MAX_CHAIN_ID
            )));
        }

        Ok(IssuerSettings {
            faucet_contract,
            chain_id: self.chain_id,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
        })
    }

    /// Parse the operator key and check it against `operator_address`.
    ///
    /// The nonce is always read for the key's own address, so a configured
    /// address pointing at another account is a configuration error.
    pub fn operator_key(&self) -> FaucetResult<OperatorKey> {
        if self.operator_private_key.trim().is_empty() {
            return Err(FaucetError::Config("operator private key is not set".to_string()));
        }
        let key = OperatorKey::from_private_key_hex(&self.operator_private_key)
            .map_err(|e| FaucetError::Config(format!("operator private key: {}", e)))?;

        if let Some(expected) = &self.operator_address {
            let expected = Address::from_str(expected).map_err(|e| {
                FaucetError::Config(format!("operator address '{}': {}", expected, e))
            })?;
            if expected != key.address() {
                return Err(FaucetError::Config(format!(
                    "operator address {} does not match the signing key's address {}",
                    expected,
                    key.address()
                )));
            }
        }

        Ok(key)
    }

    /// Get RPC request timeout
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> FaucetResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| FaucetError::Config(format!("{} has invalid value '{}'", name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const HARDHAT_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const HARDHAT_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    const CONTRACT: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn configured() -> FaucetConfig {
        FaucetConfig {
            operator_private_key: HARDHAT_KEY.to_string(),
            faucet_contract: CONTRACT.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = FaucetConfig::default();
        assert_eq!(config.chain_id, 78787);
        assert_eq!(config.gas_price, 5_000_000_000);
        assert_eq!(config.gas_limit, 500_000);
        assert_eq!(config.rpc_timeout(), Duration::from_secs(30));
        assert!(config.operator_address.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = FaucetConfig::default();
        config
            .apply_overrides(lookup_from(&[
                ("FAUCET_RPC_URL", "http://localhost:8545"),
                ("FAUCET_CHAIN_ID", "31337"),
                ("FAUCET_GAS_PRICE", "1000000000"),
                ("FAUCET_GAS_LIMIT", "100000"),
                ("FAUCET_CONTRACT_ADDRESS", CONTRACT),
                ("FAUCET_OPERATOR_ADDRESS", HARDHAT_ADDRESS),
                ("FAUCET_CORS_ENABLED", "FALSE"),
                ("FAUCET_LOG_FORMAT", "json"),
            ]))
            .unwrap();

        assert_eq!(config.rpc_url, "http://localhost:8545");
        assert_eq!(config.chain_id, 31337);
        assert_eq!(config.gas_price, 1_000_000_000);
        assert_eq!(config.gas_limit, 100_000);
        assert_eq!(config.faucet_contract, CONTRACT);
        assert_eq!(config.operator_address.as_deref(), Some(HARDHAT_ADDRESS));
        assert!(!config.cors_enabled);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_invalid_numeric_override_rejected() {
        let mut config = FaucetConfig::default();
        let result = config.apply_overrides(lookup_from(&[("FAUCET_GAS_PRICE", "5 gwei")]));
        assert!(matches!(result, Err(FaucetError::Config(_))));
    }

    #[test]
    fn test_issuer_settings() {
        let settings = configured().issuer_settings().unwrap();
        assert_eq!(settings.faucet_contract.to_checksum(), CONTRACT);
        assert_eq!(settings.chain_id, 78787);
        assert_eq!(settings.gas_limit, 500_000);

        let missing = FaucetConfig::default().issuer_settings();
        assert!(matches!(missing, Err(FaucetError::Config(_))));

        let bad = FaucetConfig {
            faucet_contract: "0x1234".to_string(),
            ..Default::default()
        };
        assert!(matches!(bad.issuer_settings(), Err(FaucetError::Config(_))));
    }

    #[test]
    fn test_out_of_range_chain_id_rejected() {
        for chain_id in [0, MAX_CHAIN_ID + 1, u64::MAX / 2, u64::MAX] {
            let config = FaucetConfig {
                chain_id,
                ..configured()
            };
            assert!(
                matches!(config.issuer_settings(), Err(FaucetError::Config(_))),
                "chain id {} accepted",
                chain_id
            );
        }

        let config = FaucetConfig {
            chain_id: MAX_CHAIN_ID,
            ..configured()
        };
        assert_eq!(config.issuer_settings().unwrap().chain_id, MAX_CHAIN_ID);
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let rendered = format!("{:?}", configured());
        assert!(!rendered.contains(&HARDHAT_KEY[2..]));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains(CONTRACT));
    }

    #[test]
    fn test_operator_key_matches_configured_address() {
        let mut config = configured();
        config.operator_address = Some(HARDHAT_ADDRESS.to_lowercase());
        let key = config.operator_key().unwrap();
        assert_eq!(key.address().to_checksum(), HARDHAT_ADDRESS);
    }

    #[test]
    fn test_operator_address_mismatch_rejected() {
        let mut config = configured();
        config.operator_address = Some(CONTRACT.to_string());
        let err = config.operator_key().unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn test_missing_operator_key_rejected() {
        let config = FaucetConfig::default();
        assert!(matches!(config.operator_key(), Err(FaucetError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faucet.toml");
        std::fs::write(
            &path,
            format!(
                "rpc_url = \"http://localhost:8545\"\nfaucet_contract = \"{}\"\ngas_limit = 250000\n\n[logging]\nlevel = \"debug\"\n",
                CONTRACT
            ),
        )
        .unwrap();

        let config: FaucetConfig = drip_common::utils::config::load_config(&path).unwrap();
        assert_eq!(config.rpc_url, "http://localhost:8545");
        assert_eq!(config.gas_limit, 250_000);
        assert_eq!(config.logging.level, "debug");
        // untouched fields keep their defaults
        assert_eq!(config.chain_id, 78787);
        assert_eq!(config.issuer_settings().unwrap().faucet_contract.to_checksum(), CONTRACT);
    }
}
