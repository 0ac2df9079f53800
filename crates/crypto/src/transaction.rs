//! Legacy (type 0) Ethereum transactions signed per EIP-155
//!
//! Signing payload: `rlp([nonce, gasPrice, gasLimit, to, value, data, chainId, 0, 0])`.
//! Broadcast form: `rlp([nonce, gasPrice, gasLimit, to, value, data, v, r, s])`
//! with `v = recoveryId + 35 + 2 * chainId`.

use crate::error::{CryptoError, CryptoResult};
use crate::keys::public_key_to_address;
use drip_common::types::{Address, ADDRESS_LENGTH};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use keccak_hash::keccak;
use rlp::{Rlp, RlpStream};

const LEGACY_FIELD_COUNT: usize = 9;
const EIP155_V_OFFSET: u64 = 35;

/// Largest chain id whose EIP-155 `v` still fits in a `u64`
pub const MAX_CHAIN_ID: u64 = (u64::MAX - EIP155_V_OFFSET - 1) / 2;

/// Unsigned legacy transaction calling a contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTransaction {
    pub nonce: u64,
    /// Gas price in wei
    pub gas_price: u64,
    pub gas_limit: u64,
    pub to: Address,
    /// Value in wei
    pub value: u64,
    pub data: Vec<u8>,
    pub chain_id: u64,
}

/// `v`, `r`, `s` of an EIP-155 signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSignature {
    pub v: u64,
    pub r: [u8; 32],
    pub s: [u8; 32],
}

impl TransactionSignature {
    /// `v` for a signature with `recovery_id` bound to `chain_id`
    pub(crate) fn pack_v(chain_id: u64, recovery_id: u8) -> Option<u64> {
        chain_id
            .checked_mul(2)?
            .checked_add(EIP155_V_OFFSET)?
            .checked_add(u64::from(recovery_id))
    }

    /// Chain id and recovery id packed into `v`, if `v` is EIP-155 shaped
    fn unpack_v(&self) -> Option<(u64, u8)> {
        let offset = self.v.checked_sub(EIP155_V_OFFSET)?;
        Some((offset / 2, (offset % 2) as u8))
    }
}

impl LegacyTransaction {
    fn append_fields(&self, stream: &mut RlpStream) {
        stream.append(&self.nonce);
        stream.append(&self.gas_price);
        stream.append(&self.gas_limit);
        stream.append(&self.to.0.to_vec());
        stream.append(&self.value);
        stream.append(&self.data);
    }

    /// keccak256 of the EIP-155 signing payload
    pub fn signing_hash(&self) -> [u8; 32] {
        let mut stream = RlpStream::new_list(LEGACY_FIELD_COUNT);
        self.append_fields(&mut stream);
        stream.append(&self.chain_id);
        stream.append(&0u8);
        stream.append(&0u8);

        keccak(stream.out()).0
    }

    /// RLP of the transaction together with its signature
    pub fn encode_signed(&self, signature: &TransactionSignature) -> Vec<u8> {
        let mut stream = RlpStream::new_list(LEGACY_FIELD_COUNT);
        self.append_fields(&mut stream);
        stream.append(&signature.v);
        stream.append(&trim_leading_zeros(&signature.r).to_vec());
        stream.append(&trim_leading_zeros(&signature.s).to_vec());
        stream.out().to_vec()
    }

    /// Parse a raw signed legacy transaction.
    pub fn decode_signed(raw: &[u8]) -> CryptoResult<(Self, TransactionSignature)> {
        let rlp = Rlp::new(raw);
        if !rlp.is_list() {
            return Err(CryptoError::MalformedTransaction("not an RLP list".to_string()));
        }

        let items = rlp.item_count()?;
        if items != LEGACY_FIELD_COUNT {
            return Err(CryptoError::MalformedTransaction(format!(
                "expected {} fields, got {}",
                LEGACY_FIELD_COUNT, items
            )));
        }

        let to_bytes: Vec<u8> = rlp.val_at(3)?;
        let to: [u8; ADDRESS_LENGTH] = to_bytes.as_slice().try_into().map_err(|_| {
            CryptoError::MalformedTransaction(format!("invalid 'to' length: {}", to_bytes.len()))
        })?;

        let signature = TransactionSignature {
            v: rlp.val_at(6)?,
            r: left_pad_32(&rlp.val_at::<Vec<u8>>(7)?)?,
            s: left_pad_32(&rlp.val_at::<Vec<u8>>(8)?)?,
        };
        let (chain_id, _) = signature.unpack_v().ok_or_else(|| {
            CryptoError::InvalidSignature(format!("v = {} is not EIP-155", signature.v))
        })?;

        let tx = LegacyTransaction {
            nonce: rlp.val_at(0)?,
            gas_price: rlp.val_at(1)?,
            gas_limit: rlp.val_at(2)?,
            to: Address(to),
            value: rlp.val_at(4)?,
            data: rlp.val_at(5)?,
            chain_id,
        };

        Ok((tx, signature))
    }

    /// Address that produced `signature` over this transaction
    pub fn recover_signer(&self, signature: &TransactionSignature) -> CryptoResult<Address> {
        let (chain_id, recovery_byte) = signature.unpack_v().ok_or_else(|| {
            CryptoError::InvalidSignature(format!("v = {} is not EIP-155", signature.v))
        })?;
        if chain_id != self.chain_id {
            return Err(CryptoError::InvalidSignature(format!(
                "signature is for chain {}, transaction is for chain {}",
                chain_id, self.chain_id
            )));
        }

        let mut rs = [0u8; 64];
        rs[..32].copy_from_slice(&signature.r);
        rs[32..].copy_from_slice(&signature.s);
        let sig = Signature::from_slice(&rs)
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
        let recovery_id = RecoveryId::from_byte(recovery_byte)
            .ok_or_else(|| CryptoError::InvalidSignature("bad recovery id".to_string()))?;

        let key = VerifyingKey::recover_from_prehash(&self.signing_hash(), &sig, recovery_id)
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
        Ok(public_key_to_address(&key))
    }
}

/// A signed transaction ready for `eth_sendRawTransaction`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    raw: Vec<u8>,
    hash: [u8; 32],
}

impl SignedTransaction {
    pub fn new(raw: Vec<u8>) -> Self {
        let hash = keccak(&raw).0;
        Self { raw, hash }
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// keccak256 of the raw bytes; the hash the network reports
    pub fn hash(&self) -> [u8; 32] {
        self.hash
    }

    pub fn hash_hex(&self) -> String {
        format!("0x{}", hex::encode(self.hash))
    }
}

fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[first..]
}

fn left_pad_32(bytes: &[u8]) -> CryptoResult<[u8; 32]> {
    if bytes.len() > 32 {
        return Err(CryptoError::InvalidSignature(format!(
            "signature component is {} bytes",
            bytes.len()
        )));
    }
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(bytes);
    Ok(out)
}
