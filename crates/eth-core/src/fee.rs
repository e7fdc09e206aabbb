use alloy_primitives::U256;
use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::units;

/// Intrinsic gas of a value transfer with no call data (yellow paper
/// G-transaction). Not configurable: every send and sweep built here is a
/// plain ether transfer.
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;

/// Fee in ether for a data-less transfer at the given gas price (wei/gas):
/// `fee = price * 21000`, exact integer arithmetic before the unit boundary.
pub fn fee_for_gas_price(gas_price: U256) -> Result<Decimal, CoreError> {
    let fee_wei = gas_price
        .checked_mul(U256::from(TRANSFER_GAS_LIMIT))
        .ok_or_else(|| CoreError::Conversion(format!("gas price {gas_price} overflows")))?;
    units::wei_to_ether(fee_wei)
}

/// Gas price (wei/gas) that spends at most `fee` ether on a data-less
/// transfer: floor division, so the realized fee never exceeds the budget.
pub fn gas_price_for_fee(fee: Decimal) -> Result<U256, CoreError> {
    Ok(units::ether_to_wei(fee)? / U256::from(TRANSFER_GAS_LIMIT))
}
