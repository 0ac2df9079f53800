use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Invalid hex string: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Invalid private key length: expected 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("Invalid private key")]
    InvalidKey,

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Invalid RLP: {0}")]
    Rlp(#[from] rlp::DecoderError),

    #[error("Malformed transaction: {0}")]
    MalformedTransaction(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
}

pub type CryptoResult<T> = Result<T, CryptoError>;
