use alloy_primitives::U256;
use rust_decimal::Decimal;

use crate::error::CoreError;

/// Fractional digits of the display unit: 1 ether = 10^18 wei.
pub const ETHER_SCALE: u32 = 18;

/// Converts wei to an exact ether amount.
///
/// The conversion is pure integer-mantissa arithmetic; amounts beyond the
/// 96-bit decimal mantissa (about 7.9e10 ether) are a `Conversion` error
/// rather than a silently rounded value.
pub fn wei_to_ether(wei: U256) -> Result<Decimal, CoreError> {
    let raw = u128::try_from(wei)
        .map_err(|_| CoreError::Conversion(format!("{wei} wei exceeds the supported range")))?;
    let mantissa = i128::try_from(raw)
        .map_err(|_| CoreError::Conversion(format!("{wei} wei exceeds the supported range")))?;

    Decimal::try_from_i128_with_scale(mantissa, ETHER_SCALE)
        .map_err(|e| CoreError::Conversion(e.to_string()))
}

/// Converts an ether amount to wei, exactly.
///
/// Fails for negative amounts and for amounts with a non-zero digit beyond
/// the 18th fractional place; `ether_to_wei(wei_to_ether(x)) == x` holds for
/// every representable `x`.
pub fn ether_to_wei(amount: Decimal) -> Result<U256, CoreError> {
    if amount.is_sign_negative() {
        return Err(CoreError::Conversion(format!(
            "amount must not be negative: {amount}"
        )));
    }

    let amount = if amount.scale() > ETHER_SCALE {
        let normalized = amount.normalize();
        if normalized.scale() > ETHER_SCALE {
            return Err(CoreError::Conversion(format!(
                "{amount} has more than {ETHER_SCALE} fractional digits"
            )));
        }
        normalized
    } else {
        amount
    };

    // mantissa * 10^(18 - scale), carried out in U256 so it cannot overflow.
    let mantissa = amount.mantissa().unsigned_abs();
    let factor = U256::from(10u8).pow(U256::from(ETHER_SCALE - amount.scale()));
    Ok(U256::from(mantissa) * factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn one_ether_is_1e18_wei() {
        let one_ether = wei_to_ether(U256::from(10u64).pow(U256::from(18u64))).unwrap();
        assert_eq!(one_ether, Decimal::ONE);
        assert_eq!(ether_to_wei(Decimal::ONE).unwrap(), U256::from(10u64).pow(U256::from(18u64)));
    }

    #[test]
    fn round_trip_boundary_values() {
        // 0, 1 wei, 21000 gwei, 1 ether, and an 18-digit fractional amount.
        for x in [0u128, 1, 21_000 * 1_000_000_000, 1_000_000_000_000_000_000, 123_456_789_012_345_678] {
            let wei = U256::from(x);
            let ether = wei_to_ether(wei).unwrap();
            assert_eq!(ether_to_wei(ether).unwrap(), wei, "round trip for {x}");
        }
    }

    #[test]
    fn decimal_round_trip() {
        for s in ["0", "0.000000000000000001", "0.5", "1.337", "42"] {
            let amount = dec(s);
            let wei = ether_to_wei(amount).unwrap();
            assert_eq!(wei_to_ether(wei).unwrap(), amount, "round trip for {s}");
        }
    }

    #[test]
    fn smallest_subunit_is_exact() {
        let ether = wei_to_ether(U256::from(1u8)).unwrap();
        assert_eq!(ether, dec("0.000000000000000001"));
    }

    #[test]
    fn negative_amount_rejected() {
        assert!(ether_to_wei(dec("-1")).is_err());
    }

    #[test]
    fn nineteen_fractional_digits_rejected() {
        // 19 significant fractional digits cannot map to an integer wei value.
        let amount = dec("0.1234567890123456789");
        assert!(ether_to_wei(amount).is_err());
    }

    #[test]
    fn trailing_zero_fraction_accepted() {
        // Scale above 18 is fine as long as the extra digits are zero.
        let amount = dec("1.0000000000000000010");
        assert_eq!(ether_to_wei(amount).unwrap(), U256::from(1_000_000_000_000_000_001u128));
    }

    #[test]
    fn oversized_wei_rejected() {
        assert!(wei_to_ether(U256::MAX).is_err());
    }
}
