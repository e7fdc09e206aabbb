//! Minimal ABI encoding/decoding for EVM contract calls.
//!
//! Just enough of the ABI to build the zero-argument ERC-20 metadata calls
//! and to decode their single return values plus `transfer` call-data. This
//! deliberately replaces any reflective or full-schema decoder with a small
//! owned routine for the handful of types the wallet needs.

use alloy_primitives::U256;

use crate::address;
use crate::error::CoreError;

/// A single ABI-encoded call parameter.
#[derive(Debug, Clone)]
pub enum AbiParam {
    /// 20-byte address, left-padded to a 32-byte word.
    Address([u8; 20]),
    /// 256-bit unsigned integer, big-endian 32-byte word.
    Uint256([u8; 32]),
}

/// Encodes `selector || word(params[0]) || word(params[1]) || ...`.
pub fn encode_function_call(selector: [u8; 4], params: &[AbiParam]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + params.len() * 32);
    data.extend_from_slice(&selector);
    for param in params {
        data.extend_from_slice(&encode_param(param));
    }
    data
}

fn encode_param(param: &AbiParam) -> [u8; 32] {
    let mut word = [0u8; 32];
    match param {
        AbiParam::Address(addr) => word[12..].copy_from_slice(addr),
        AbiParam::Uint256(value) => word.copy_from_slice(value),
    }
    word
}

/// Decodes an address word: the last 20 bytes of a 32-byte word, returned as
/// an EIP-55 checksummed string.
pub fn decode_address_word(word: &[u8]) -> Result<String, CoreError> {
    if word.len() < 32 {
        return Err(CoreError::Decode(format!(
            "expected a 32-byte word for address, got {} bytes",
            word.len()
        )));
    }
    address::checksum_address(&format!("0x{}", hex::encode(&word[12..32])))
}

/// Decodes a uint256 word (big-endian, first 32 bytes of `word`).
pub fn decode_uint256_word(word: &[u8]) -> Result<U256, CoreError> {
    if word.len() < 32 {
        return Err(CoreError::Decode(format!(
            "expected a 32-byte word for uint256, got {} bytes",
            word.len()
        )));
    }
    Ok(U256::from_be_slice(&word[..32]))
}

/// Decodes a `uint8` return value (one word, value must fit in 8 bits).
pub fn decode_u8_return(data: &[u8]) -> Result<u8, CoreError> {
    let value = decode_uint256_word(data)?;
    u8::try_from(value).map_err(|_| CoreError::Decode(format!("{value} does not fit in uint8")))
}

/// Decodes a single dynamic `string` return value: one offset word, then a
/// length word, then UTF-8 bytes.
pub fn decode_string_return(data: &[u8]) -> Result<String, CoreError> {
    let offset_word = decode_uint256_word(data)?;
    let offset = usize::try_from(offset_word)
        .map_err(|_| CoreError::Decode("string offset out of range".into()))?;

    let tail = data
        .get(offset..)
        .ok_or_else(|| CoreError::Decode("string offset past end of data".into()))?;
    let length = usize::try_from(decode_uint256_word(tail)?)
        .map_err(|_| CoreError::Decode("string length out of range".into()))?;

    let bytes = tail
        .get(32..32 + length)
        .ok_or_else(|| CoreError::Decode("string data truncated".into()))?;

    String::from_utf8(bytes.to_vec())
        .map_err(|e| CoreError::Decode(format!("string is not valid UTF-8: {e}")))
}

/// Decodes a 0x-prefixed (or bare) hex string into bytes.
pub fn hex_to_bytes(input: &str) -> Result<Vec<u8>, CoreError> {
    let stripped = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    hex::decode(stripped).map_err(|e| CoreError::Decode(format!("invalid hex: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_selector_only_call() {
        let data = encode_function_call([0x06, 0xfd, 0xde, 0x03], &[]);
        assert_eq!(data, vec![0x06, 0xfd, 0xde, 0x03]);
    }

    #[test]
    fn encode_address_left_pads() {
        let mut addr = [0u8; 20];
        addr[0] = 0xde;
        addr[19] = 0xad;

        let data = encode_function_call([0; 4], &[AbiParam::Address(addr)]);
        assert_eq!(data.len(), 36);
        assert_eq!(&data[4..16], &[0u8; 12]);
        assert_eq!(&data[16..36], &addr);
    }

    #[test]
    fn encode_uint256_verbatim() {
        let mut value = [0u8; 32];
        value[31] = 42;

        let data = encode_function_call([0; 4], &[AbiParam::Uint256(value)]);
        assert_eq!(&data[4..36], &value);
    }

    #[test]
    fn decode_address_strips_padding() {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(&[0xde; 20]);

        let address = decode_address_word(&word).unwrap();
        assert!(address.to_lowercase().starts_with("0xdede"));
        assert_eq!(address.len(), 42);
    }

    #[test]
    fn decode_address_short_word_errors() {
        assert!(decode_address_word(&[0u8; 16]).is_err());
    }

    #[test]
    fn decode_uint256_big_endian() {
        let mut word = [0u8; 32];
        word[30] = 0x01;
        word[31] = 0x02;
        assert_eq!(decode_uint256_word(&word).unwrap(), U256::from(0x0102u64));
    }

    #[test]
    fn decode_u8_in_range() {
        let mut word = [0u8; 32];
        word[31] = 18;
        assert_eq!(decode_u8_return(&word).unwrap(), 18);
    }

    #[test]
    fn decode_u8_overflow_errors() {
        let mut word = [0u8; 32];
        word[30] = 1; // 256
        assert!(decode_u8_return(&word).is_err());
    }

    #[test]
    fn decode_string_return_value() {
        // offset = 32, length = 5, "Token" right-padded.
        let mut data = vec![0u8; 96];
        data[31] = 32;
        data[63] = 5;
        data[64..69].copy_from_slice(b"Token");

        assert_eq!(decode_string_return(&data).unwrap(), "Token");
    }

    #[test]
    fn decode_string_truncated_errors() {
        let mut data = vec![0u8; 64];
        data[31] = 32;
        data[63] = 50; // claims 50 bytes, none present
        assert!(decode_string_return(&data).is_err());
    }

    #[test]
    fn decode_string_bogus_offset_errors() {
        let mut data = vec![0u8; 32];
        data[31] = 0xff;
        assert!(decode_string_return(&data).is_err());
    }

    #[test]
    fn hex_to_bytes_accepts_both_forms() {
        assert_eq!(hex_to_bytes("0xdead").unwrap(), vec![0xde, 0xad]);
        assert_eq!(hex_to_bytes("dead").unwrap(), vec![0xde, 0xad]);
        assert!(hex_to_bytes("0xzz").is_err());
    }
}
