//! Operator keys and legacy transaction signing for the drip relay.

pub mod error;
pub mod keys;
pub mod transaction;

pub use error::{CryptoError, CryptoResult};
pub use keys::{public_key_to_address, OperatorKey};
pub use transaction::{LegacyTransaction, MAX_CHAIN_ID, SignedTransaction, TransactionSignature};
