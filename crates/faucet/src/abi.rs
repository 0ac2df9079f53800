//! Call data for the faucet contract's `drip(address)` entry point

use drip_common::types::Address;
use ethabi::{ParamType, Token};

pub const DRIP_FUNCTION: &str = "drip";

/// First 4 bytes of keccak256("drip(address)")
pub fn drip_selector() -> [u8; 4] {
    ethabi::short_signature(DRIP_FUNCTION, &[ParamType::Address])
}

/// Selector followed by the recipient as one 32-byte word.
pub fn encode_drip_call(recipient: &Address) -> Vec<u8> {
    let mut data = drip_selector().to_vec();
    data.extend(ethabi::encode(&[Token::Address(ethabi::Address::from(recipient.0))]));
    data
}
