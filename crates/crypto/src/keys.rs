//! Operator signing key

use crate::error::{CryptoError, CryptoResult};
use crate::transaction::{LegacyTransaction, SignedTransaction, TransactionSignature};
use drip_common::types::{Address, ADDRESS_LENGTH};
use k256::ecdsa::{RecoveryId, SigningKey, VerifyingKey};
use keccak_hash::keccak;
use std::fmt;

const PRIVATE_KEY_LENGTH: usize = 32;

/// secp256k1 key of the account that signs and pays for drips.
///
/// The key material is zeroized by `k256` when this value is dropped.
pub struct OperatorKey {
    signing_key: SigningKey,
    address: Address,
}

impl OperatorKey {
    pub fn new(signing_key: SigningKey) -> Self {
        let address = public_key_to_address(signing_key.verifying_key());
        Self {
            signing_key,
            address,
        }
    }

    /// Parse a 32-byte hex private key, with or without `0x`.
    pub fn from_private_key_hex(hex_str: &str) -> CryptoResult<Self> {
        let stripped = hex_str.trim().strip_prefix("0x").unwrap_or(hex_str.trim());
        let bytes = hex::decode(stripped)?;
        if bytes.len() != PRIVATE_KEY_LENGTH {
            return Err(CryptoError::InvalidKeyLength(bytes.len()));
        }

        let signing_key = SigningKey::from_slice(&bytes).map_err(|_| CryptoError::InvalidKey)?;
        Ok(Self::new(signing_key))
    }

    /// Address derived from the public key; the account whose nonce a
    /// transaction signed by this key must carry.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign `tx` per EIP-155 and return the raw broadcastable bytes.
    pub fn sign_transaction(&self, tx: &LegacyTransaction) -> CryptoResult<SignedTransaction> {
        let sighash = tx.signing_hash();

        let (mut signature, mut recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(&sighash)
            .map_err(|e| CryptoError::Signing(e.to_string()))?;

        // Ethereum only accepts low-s signatures
        if let Some(normalized) = signature.normalize_s() {
            signature = normalized;
            recovery_id = RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced());
        }

        let r_bytes: [u8; 32] = signature.r().to_bytes().into();
        let s_bytes: [u8; 32] = signature.s().to_bytes().into();

        let v = TransactionSignature::pack_v(tx.chain_id, recovery_id.to_byte()).ok_or_else(|| {
            CryptoError::Signing(format!("chain id {} does not fit an EIP-155 v", tx.chain_id))
        })?;

        let sig = TransactionSignature {
            v,
            r: r_bytes,
            s: s_bytes,
        };

        Ok(SignedTransaction::new(tx.encode_signed(&sig)))
    }
}

impl fmt::Debug for OperatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorKey")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// keccak256 of the uncompressed public key (without the 0x04 tag), last 20 bytes
pub fn public_key_to_address(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak(&point.as_bytes()[1..]);

    let mut bytes = [0u8; ADDRESS_LENGTH];
    bytes.copy_from_slice(&hash.0[32 - ADDRESS_LENGTH..]);
    Address(bytes)
}
