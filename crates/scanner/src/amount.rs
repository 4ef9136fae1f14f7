//! Rendering of raw integer on-chain balances as decimal amounts.
//!
//! Substrate chains have no native fixed-point type; balances travel as
//! unsigned integer digit strings and each asset declares how many of the
//! trailing digits are fractional.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("negative scale: {0}")]
    NegativeScale(i32),
}

/// Insert a decimal point `scale` digits from the right end of `digits`.
///
/// Values below one are rendered with a `0.` prefix and zero padding.
/// A scale of zero returns the digit string unchanged.
pub fn format_fixed_point(digits: &str, scale: i32) -> Result<String, AmountError> {
    if scale < 0 {
        return Err(AmountError::NegativeScale(scale));
    }
    let scale = scale as usize;

    if scale == 0 {
        return Ok(digits.to_string());
    }

    if digits.len() > scale {
        let split = digits.len() - scale;
        Ok(format!("{}.{}", &digits[..split], &digits[split..]))
    } else {
        Ok(format!("0.{}{}", "0".repeat(scale - digits.len()), digits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_inserted_inside_digits() {
        assert_eq!(format_fixed_point("12345", 2).unwrap(), "123.45");
    }

    #[test]
    fn test_value_below_one_is_zero_padded() {
        assert_eq!(format_fixed_point("5", 3).unwrap(), "0.005");
        assert_eq!(format_fixed_point("45", 2).unwrap(), "0.45");
    }

    #[test]
    fn test_zero_scale_passes_through() {
        assert_eq!(format_fixed_point("0", 0).unwrap(), "0");
        assert_eq!(format_fixed_point("12345", 0).unwrap(), "12345");
    }

    #[test]
    fn test_chain_balance_at_default_precision() {
        // 1.5 XOR at the chain's 18 decimal places
        assert_eq!(
            format_fixed_point("1500000000000000000", 18).unwrap(),
            "1.500000000000000000"
        );
    }

    #[test]
    fn test_negative_scale_rejected() {
        assert_eq!(
            format_fixed_point("12345", -1),
            Err(AmountError::NegativeScale(-1))
        );
    }
}
