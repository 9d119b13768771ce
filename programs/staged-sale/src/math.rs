use anchor_lang::prelude::*;
use ruint::aliases::U256;
use crate::constants::BPS_DENOMINATOR;
use crate::errors::ErrorCode;

/// Computes `floor(amount * numerator / denominator)` in 256-bit space.
pub fn mul_div_floor(amount: u64, numerator: u128, denominator: u128) -> Result<u64> {
    require!(denominator > 0, ErrorCode::MathOverflow);

    let product = U256::from(amount)
        .checked_mul(U256::from(numerator))
        .ok_or(ErrorCode::MathOverflow)?;
    let quotient = product
        .checked_div(U256::from(denominator))
        .ok_or(ErrorCode::MathOverflow)?;

    narrow_to_u64(quotient)
}

/// Basis-point share of `amount`, rounded down.
pub fn bps_share(amount: u64, bps: u16) -> Result<u64> {
    mul_div_floor(amount, bps as u128, BPS_DENOMINATOR)
}

fn narrow_to_u64(value: U256) -> Result<u64> {
    require!(value <= U256::from(u64::MAX), ErrorCode::MathOverflow);
    Ok(value.as_limbs()[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::REWARD_RATE_SCALE;

    #[test]
    fn test_mul_div_floor_truncates() {
        assert_eq!(mul_div_floor(10, 1, 3).unwrap(), 3);
        assert_eq!(mul_div_floor(1, REWARD_RATE_SCALE / 2, REWARD_RATE_SCALE).unwrap(), 0);
    }

    #[test]
    fn test_mul_div_floor_wide_intermediate() {
        // u64::MAX * 1e24 overflows u128 but the quotient still fits
        let rate = REWARD_RATE_SCALE * 1_000_000;
        let result = mul_div_floor(u64::MAX, rate, rate).unwrap();
        assert_eq!(result, u64::MAX);
    }

    #[test]
    fn test_mul_div_floor_overflowing_quotient() {
        assert!(mul_div_floor(u64::MAX, 2, 1).is_err());
        assert!(mul_div_floor(1, 1, 0).is_err());
    }

    #[test]
    fn test_bps_share() {
        assert_eq!(bps_share(5_000_000_000, 8000).unwrap(), 4_000_000_000);
        assert_eq!(bps_share(7, 5000).unwrap(), 3);
        assert_eq!(bps_share(100, 0).unwrap(), 0);
        assert_eq!(bps_share(100, 10_000).unwrap(), 100);
    }
}
