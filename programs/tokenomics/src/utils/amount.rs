//! Fixed-point helpers. Amounts are integer base units of a mint; products are
//! widened to u128 and divided last.

use crate::constants::BPS_DENOMINATOR;
use crate::error::TokenomicsError;

/// `amount * numerator / denominator`, rounded down.
pub fn mul_div(amount: u64, numerator: u64, denominator: u64) -> Result<u64, TokenomicsError> {
    if denominator == 0 {
        return Err(TokenomicsError::MathOverflow);
    }
    let product = (amount as u128)
        .checked_mul(numerator as u128)
        .ok_or(TokenomicsError::MathOverflow)?;
    u64::try_from(product / denominator as u128).map_err(|_| TokenomicsError::MathOverflow)
}

/// Scale a whole-token quantity to base units of a mint with `decimals`.
pub fn to_base_units(whole: u64, decimals: u8) -> Result<u64, TokenomicsError> {
    let scale = 10u64
        .checked_pow(decimals as u32)
        .ok_or(TokenomicsError::MathOverflow)?;
    whole.checked_mul(scale).ok_or(TokenomicsError::MathOverflow)
}

/// Share of `amount` expressed in basis points, rounded down.
pub fn bps_of(amount: u64, bps: u16) -> Result<u64, TokenomicsError> {
    mul_div(amount, bps as u64, BPS_DENOMINATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplies_before_dividing() {
        // 46 tokens (9 decimals) at 22 of 23 releases.
        let reserved = 46_000_000_000;
        assert_eq!(mul_div(reserved, 22, 23).unwrap(), 44_000_000_000);
        // Divide-first would lose everything here.
        assert_eq!(mul_div(7, 3, 10).unwrap(), 2);
        assert_eq!(mul_div(u64::MAX, 2, 2).unwrap(), u64::MAX);
    }

    #[test]
    fn rejects_zero_denominator_and_overflow() {
        assert!(matches!(mul_div(1, 1, 0), Err(TokenomicsError::MathOverflow)));
        assert!(matches!(
            mul_div(u64::MAX, 3, 2),
            Err(TokenomicsError::MathOverflow)
        ));
        assert!(matches!(
            to_base_units(u64::MAX, 9),
            Err(TokenomicsError::MathOverflow)
        ));
    }

    #[test]
    fn base_units_and_bps() {
        assert_eq!(to_base_units(15, 9).unwrap(), 15_000_000_000);
        assert_eq!(to_base_units(3, 0).unwrap(), 3);
        assert_eq!(bps_of(46_000_000_000, 1_000).unwrap(), 4_600_000_000);
        assert_eq!(bps_of(9, 1_000).unwrap(), 0);
    }
}
