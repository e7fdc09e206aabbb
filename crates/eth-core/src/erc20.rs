//! ERC-20 constants and call-data handling.

use alloy_primitives::U256;

use crate::abi::{self, encode_function_call};
use crate::error::CoreError;

/// `transfer(address,uint256)`.
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];
/// `name()`.
pub const NAME_SELECTOR: [u8; 4] = [0x06, 0xfd, 0xde, 0x03];
/// `symbol()`.
pub const SYMBOL_SELECTOR: [u8; 4] = [0x95, 0xd8, 0x9b, 0x41];
/// `decimals()`.
pub const DECIMALS_SELECTOR: [u8; 4] = [0x31, 0x3c, 0xe5, 0x67];
/// `totalSupply()`.
pub const TOTAL_SUPPLY_SELECTOR: [u8; 4] = [0x18, 0x16, 0x0d, 0xdd];

/// Keccak-256 of `Transfer(address,address,uint256)`, the topic every ERC-20
/// transfer log carries regardless of token contract.
pub const TRANSFER_EVENT_TOPIC: &str =
    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

/// Call data for one of the zero-argument metadata getters.
pub fn metadata_call(selector: [u8; 4]) -> Vec<u8> {
    encode_function_call(selector, &[])
}

/// Decoded fields of raw `transfer(address,uint256)` call data.
///
/// The two fields are independent best-effort decodes: malformed or
/// truncated input leaves a field `None` without affecting the other and
/// without failing the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCallInput {
    /// Transfer recipient, EIP-55 checksummed.
    pub to: Option<String>,
    /// Transfer amount in the token's own base units.
    pub value: Option<U256>,
}

/// Decodes `transfer` call data from a hex input string
/// (`selector || address word || amount word`).
pub fn decode_transfer_input(input: &str) -> TransferCallInput {
    TransferCallInput {
        to: decode_transfer_to(input).ok(),
        value: decode_transfer_value(input).ok(),
    }
}

/// Recipient field: hex characters 8..72 of the payload after the selector.
pub fn decode_transfer_to(input: &str) -> Result<String, CoreError> {
    let payload = strip_selector(input)?;
    let word = payload
        .get(8..72)
        .ok_or_else(|| CoreError::Decode("input too short for recipient".into()))?;
    abi::decode_address_word(&abi::hex_to_bytes(word)?)
}

/// Amount field: the 32-byte word following the recipient.
pub fn decode_transfer_value(input: &str) -> Result<U256, CoreError> {
    let payload = strip_selector(input)?;
    let word = payload
        .get(72..136)
        .ok_or_else(|| CoreError::Decode("input too short for amount".into()))?;
    abi::decode_uint256_word(&abi::hex_to_bytes(word)?)
}

/// Strips the 0x prefix, leaving `selector || arguments` hex. The recipient
/// and amount offsets are relative to this payload.
fn strip_selector(input: &str) -> Result<&str, CoreError> {
    let payload = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    if payload.len() < 8 {
        return Err(CoreError::Decode("input shorter than a selector".into()));
    }
    Ok(payload)
}
