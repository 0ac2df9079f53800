//! Account address validation (EIP-55)
//!
//! An address is `0x` followed by 40 hex digits. All-lowercase and
//! all-uppercase bodies carry no checksum information and are accepted as-is;
//! a mixed-case body must match the EIP-55 capitalization exactly.

use crate::error::AddressError;
use crate::types::{Address, ADDRESS_LENGTH};
use keccak_hash::keccak;

const PREFIX: &str = "0x";
const HEX_LENGTH: usize = ADDRESS_LENGTH * 2;

/// Returns true if `input` parses as an account address.
pub fn is_valid(input: &str) -> bool {
    validate(input).is_ok()
}

/// Parse `input` into an [`Address`], enforcing the checksum on mixed-case input.
pub fn validate(input: &str) -> Result<Address, AddressError> {
    let body = input.strip_prefix(PREFIX).ok_or(AddressError::MissingPrefix)?;

    if body.len() != HEX_LENGTH {
        return Err(AddressError::InvalidLength(body.len()));
    }
    if !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AddressError::InvalidHex);
    }

    let mut bytes = [0u8; ADDRESS_LENGTH];
    hex::decode_to_slice(body, &mut bytes).map_err(|_| AddressError::InvalidHex)?;
    let address = Address(bytes);

    let has_lower = body.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = body.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper && address.to_checksum()[PREFIX.len()..] != *body {
        return Err(AddressError::ChecksumMismatch);
    }

    Ok(address)
}

/// EIP-55 rendering: a hex letter is uppercased when the matching nibble of
/// keccak256(lowercase hex) is 8 or above.
pub(crate) fn checksum_encode(bytes: &[u8; ADDRESS_LENGTH]) -> String {
    let lower = hex::encode(bytes);
    let hash = keccak(lower.as_bytes());

    let mut out = String::with_capacity(PREFIX.len() + HEX_LENGTH);
    out.push_str(PREFIX);
    for (i, c) in lower.chars().enumerate() {
        let byte = hash.0[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUMMED: [&str; 5] = [
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        "0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B",
    ];

    #[test]
    fn test_checksum_vectors() {
        for s in CHECKSUMMED {
            let addr = validate(s).unwrap();
            assert_eq!(addr.to_checksum(), s);
        }
    }

    #[test]
    fn test_uniform_case_accepted() {
        for s in CHECKSUMMED {
            let lower = format!("0x{}", s[2..].to_ascii_lowercase());
            let upper = format!("0x{}", s[2..].to_ascii_uppercase());
            assert!(is_valid(&lower), "{}", lower);
            assert!(is_valid(&upper), "{}", upper);
        }
        assert!(is_valid("0x52908400098527886E0F7030069857D2E4169EE7"));
        assert!(is_valid("0xde709f2102306220921060314715629080e2fb77"));
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let addr = validate("0xab5801a7d398351b8be11c439e05c5b3259aec9b").unwrap();
        let again = validate(&addr.to_checksum()).unwrap();
        assert_eq!(addr, again);
        assert_eq!(addr.to_checksum(), again.to_checksum());
    }

    #[test]
    fn test_wrong_checksum_rejected() {
        for s in CHECKSUMMED {
            // flip the case of the first letter in the body
            let pos = s[2..].find(|c: char| c.is_ascii_alphabetic()).unwrap() + 2;
            let mut chars: Vec<char> = s.chars().collect();
            let c = chars[pos];
            chars[pos] = if c.is_ascii_uppercase() {
                c.to_ascii_lowercase()
            } else {
                c.to_ascii_uppercase()
            };
            let broken: String = chars.into_iter().collect();
            assert_eq!(validate(&broken), Err(AddressError::ChecksumMismatch), "{}", broken);
        }
    }

    #[test]
    fn test_malformed_inputs() {
        assert_eq!(validate(""), Err(AddressError::MissingPrefix));
        assert_eq!(validate("not-an-address"), Err(AddressError::MissingPrefix));
        assert_eq!(validate("0x123"), Err(AddressError::InvalidLength(3)));
        assert_eq!(
            validate("ab5801a7d398351b8be11c439e05c5b3259aec9b"),
            Err(AddressError::MissingPrefix)
        );
        assert_eq!(
            validate("0xzb5801a7d398351b8be11c439e05c5b3259aec9b"),
            Err(AddressError::InvalidHex)
        );
        assert_eq!(
            validate("0xab5801a7d398351b8be11c439e05c5b3259aec9b00"),
            Err(AddressError::InvalidLength(42))
        );
        assert!(!is_valid(" 0xab5801a7d398351b8be11c439e05c5b3259aec9b"));
        assert!(!is_valid("0Xab5801a7d398351b8be11c439e05c5b3259aec9b"));
    }

    #[test]
    fn test_non_ascii_input_does_not_panic() {
        // 40 bytes, but not 40 hex digits
        let input = format!("0x{}é", "a".repeat(38));
        assert_eq!(input.len(), 42);
        assert_eq!(validate(&input), Err(AddressError::InvalidHex));
    }
}
