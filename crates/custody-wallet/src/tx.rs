//! Transfer-request assembly and the local checks that run before any
//! network call.

use alloy_primitives::U256;
use eth_core::{address, fee};
use eth_rpc::TransactionRequest;
use rust_decimal::Decimal;

use crate::error::WalletError;

pub(crate) fn validate_recipient(recipient: &str) -> Result<(), WalletError> {
    if !address::is_valid_address(recipient) {
        return Err(WalletError::Validation(format!(
            "recipient address is invalid: {recipient}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_amount(amount: Decimal) -> Result<(), WalletError> {
    if amount <= Decimal::ZERO {
        return Err(WalletError::Validation(format!(
            "amount must be greater than zero, got {amount}"
        )));
    }
    Ok(())
}

/// Assembles the request for a plain ether transfer. The nonce must have
/// been fetched fresh for this send; nothing here caches it.
pub(crate) fn build_transfer(
    from: &str,
    nonce: u64,
    gas_price: U256,
    to: &str,
    value_wei: U256,
) -> TransactionRequest {
    TransactionRequest {
        from: from.to_string(),
        to: to.to_string(),
        nonce: U256::from(nonce),
        gas_price,
        gas: U256::from(fee::TRANSFER_GAS_LIMIT),
        value: value_wei,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const ADDR: &str = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";

    #[test]
    fn valid_recipient_passes() {
        assert!(validate_recipient(ADDR).is_ok());
    }

    #[test]
    fn invalid_recipient_is_validation_error() {
        let err = validate_recipient("0xnot-an-address").unwrap_err();
        assert!(matches!(err, WalletError::Validation(_)));
    }

    #[test]
    fn zero_amount_rejected() {
        assert!(validate_amount(Decimal::ZERO).is_err());
    }

    #[test]
    fn negative_amount_rejected() {
        assert!(validate_amount(Decimal::from_str("-0.1").unwrap()).is_err());
    }

    #[test]
    fn positive_amount_accepted() {
        assert!(validate_amount(Decimal::from_str("0.000000000000000001").unwrap()).is_ok());
    }

    #[test]
    fn transfer_uses_fixed_gas_limit() {
        let request = build_transfer(ADDR, 9, U256::from(5u8), ADDR, U256::from(100u8));
        assert_eq!(request.gas, U256::from(21_000u64));
        assert_eq!(request.nonce, U256::from(9u8));
        assert_eq!(request.gas_price, U256::from(5u8));
        assert_eq!(request.value, U256::from(100u8));
    }
}
