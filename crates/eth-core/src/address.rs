use sha3::{Digest, Keccak256};

use crate::error::CoreError;

/// Derives the EIP-55 checksummed address from an uncompressed secp256k1
/// public key (65 bytes, 0x04 prefix): Keccak-256 of the 64-byte key, last
/// 20 bytes.
pub fn pubkey_to_address(uncompressed_pubkey: &[u8; 65]) -> Result<String, CoreError> {
    if uncompressed_pubkey[0] != 0x04 {
        return Err(CoreError::InvalidAddress(
            "uncompressed public key must start with 0x04".into(),
        ));
    }

    let hash = Keccak256::digest(&uncompressed_pubkey[1..]);
    checksum_address(&format!("0x{}", hex::encode(&hash[12..])))
}

/// Syntactic address check: `0x` + 40 hex digits, case-insensitive. The
/// EIP-55 checksum is only enforced when the address is mixed-case.
pub fn is_valid_address(address: &str) -> bool {
    let Some(hex_part) = strip_0x(address) else {
        return false;
    };

    if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return false;
    }

    let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
    if !(has_upper && has_lower) {
        // Single-case addresses carry no checksum.
        return true;
    }

    matches!(checksum_address(address), Ok(checksummed) if checksummed == address)
}

/// Applies the EIP-55 mixed-case checksum to a 0x-prefixed address.
pub fn checksum_address(address: &str) -> Result<String, CoreError> {
    let hex_part = strip_0x(address)
        .ok_or_else(|| CoreError::InvalidAddress("address must start with 0x".into()))?
        .to_lowercase();

    if hex_part.len() != 40 {
        return Err(CoreError::InvalidAddress(format!(
            "expected 40 hex digits, got {}",
            hex_part.len()
        )));
    }
    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CoreError::InvalidAddress("non-hex digit in address".into()));
    }

    let hash = Keccak256::digest(hex_part.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in hex_part.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }

    Ok(out)
}

fn strip_0x(address: &str) -> Option<&str> {
    address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_known_eip55_vectors() {
        let cases = [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ];

        for expected in cases {
            let lower = format!("0x{}", expected[2..].to_lowercase());
            assert_eq!(checksum_address(&lower).unwrap(), expected);
        }
    }

    #[test]
    fn valid_lowercase_accepted() {
        assert!(is_valid_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
    }

    #[test]
    fn valid_uppercase_accepted() {
        assert!(is_valid_address("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED"));
    }

    #[test]
    fn valid_checksummed_accepted() {
        assert!(is_valid_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
    }

    #[test]
    fn broken_checksum_rejected() {
        // One letter with the wrong case.
        assert!(!is_valid_address("0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
    }

    #[test]
    fn wrong_length_rejected() {
        assert!(!is_valid_address("0x5aaeb6053f"));
        assert!(!is_valid_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed00"));
    }

    #[test]
    fn missing_prefix_rejected() {
        assert!(!is_valid_address("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
    }

    #[test]
    fn non_hex_rejected() {
        assert!(!is_valid_address("0xzzaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
    }

    #[test]
    fn pubkey_to_address_known_vector() {
        // Private key 0x...01 has a well-known address.
        use k256::elliptic_curve::sec1::ToEncodedPoint;
        use k256::SecretKey;

        let mut privkey = [0u8; 32];
        privkey[31] = 1;
        let secret = SecretKey::from_bytes((&privkey).into()).unwrap();
        let uncompressed = secret.public_key().to_encoded_point(false);

        let mut key_65 = [0u8; 65];
        key_65.copy_from_slice(uncompressed.as_bytes());

        let address = pubkey_to_address(&key_65).unwrap();
        assert_eq!(address, "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");
    }

    #[test]
    fn pubkey_wrong_prefix_errors() {
        let mut key = [0u8; 65];
        key[0] = 0x02;
        assert!(pubkey_to_address(&key).is_err());
    }
}
