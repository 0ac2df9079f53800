//! Drip faucet relay
//!
//! Validates a recipient address, then builds, signs and broadcasts one
//! `drip(recipient)` call from the operator account:
//! - EIP-55 address validation before any network access
//! - Nonce read for the signing account itself
//! - Legacy EIP-155 transactions with fixed gas parameters
//! - Broadcast failures flattened into a single opaque outcome
//! - HTTP API

pub mod abi;
pub mod api;
pub mod config;
pub mod error;
pub mod issuer;
pub mod rpc;
pub mod service;

pub use config::{FaucetConfig, IssuerSettings};
pub use error::{FaucetError, FaucetResult};
pub use issuer::{DripIssuer, DripOutcome};
pub use rpc::{EthRpc, HttpRpcClient};
pub use service::{ClaimService, FaucetStatus};
