//! JSON-RPC access to the network

use crate::error::{FaucetError, FaucetResult};
use async_trait::async_trait;
use drip_common::types::Address;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// The two calls the issuer needs, plus the chain id check done at startup.
#[async_trait]
pub trait EthRpc: Send + Sync {
    /// `eth_chainId`
    async fn chain_id(&self) -> FaucetResult<u64>;

    /// `eth_getTransactionCount` at the `latest` block
    async fn get_transaction_count(&self, address: &Address) -> FaucetResult<u64>;

    /// `eth_sendRawTransaction`; returns the transaction hash reported by the node
    async fn send_raw_transaction(&self, raw: &[u8]) -> FaucetResult<String>;
}

/// RPC client for interacting with blockchain over HTTP
pub struct HttpRpcClient {
    rpc_url: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl HttpRpcClient {
    pub fn new(rpc_url: impl Into<String>, timeout: Duration) -> FaucetResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FaucetError::Internal(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            rpc_url: rpc_url.into(),
            client,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.rpc_url
    }

    async fn call(&self, method: &str, params: Value) -> FaucetResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id
        });

        debug!("RPC request {} id={}", method, id);

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| FaucetError::Rpc(format!("{} request failed: {}", method, e)))?;

        let status = response.status();
        let body: Value = response.json().await.map_err(|e| {
            FaucetError::Rpc(format!("{} returned an invalid response (HTTP {}): {}", method, status, e))
        })?;

        if let Some(error) = body.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(FaucetError::Rpc(format!("{} rejected: {}", method, message)));
        }

        if !status.is_success() {
            return Err(FaucetError::Rpc(format!("{} failed with HTTP {}", method, status)));
        }

        body.get("result")
            .cloned()
            .ok_or_else(|| FaucetError::Rpc(format!("{} response has no result", method)))
    }
}

#[async_trait]
impl EthRpc for HttpRpcClient {
    async fn chain_id(&self) -> FaucetResult<u64> {
        let result = self.call("eth_chainId", json!([])).await?;
        parse_quantity(&result)
    }

    async fn get_transaction_count(&self, address: &Address) -> FaucetResult<u64> {
        let result = self
            .call("eth_getTransactionCount", json!([address.to_hex(), "latest"]))
            .await?;
        parse_quantity(&result)
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> FaucetResult<String> {
        let result = self
            .call("eth_sendRawTransaction", json!([format!("0x{}", hex::encode(raw))]))
            .await?;

        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| FaucetError::Rpc(format!("expected a transaction hash, got {}", result)))
    }
}

/// Parse a JSON-RPC hex quantity such as `"0x1a"`.
pub fn parse_quantity(value: &Value) -> FaucetResult<u64> {
    let text = value
        .as_str()
        .ok_or_else(|| FaucetError::Rpc(format!("expected a hex quantity, got {}", value)))?;
    let digits = text
        .strip_prefix("0x")
        .filter(|d| !d.is_empty())
        .ok_or_else(|| FaucetError::Rpc(format!("malformed hex quantity '{}'", text)))?;

    u64::from_str_radix(digits, 16)
        .map_err(|e| FaucetError::Rpc(format!("malformed hex quantity '{}': {}", text, e)))
}
