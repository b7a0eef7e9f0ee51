//! Verified decimal expansion of π.
//!
//! The table holds the fractional digits only ("14159..."), never the
//! leading "3.". Adding the integer part is left to the formatter so digit
//! counts always mean decimals.

use crate::error::DigitsError;

static PI_DIGITS: &str = include_str!("data/pi_digits.txt");

/// Number of decimals the embedded table holds
pub const MAX_DIGITS: usize = 5000;

/// Substituted when a caller asks for zero digits
pub const DEFAULT_LENGTH: usize = 15;

/// Returns the first `length` decimals of π.
///
/// A length of zero yields [`DEFAULT_LENGTH`] decimals.
pub fn digits(length: i64) -> Result<&'static str, DigitsError> {
    if length < 0 {
        return Err(DigitsError::InvalidLength(length));
    }

    let length = match length as usize {
        0 => DEFAULT_LENGTH,
        n => n,
    };

    if length > MAX_DIGITS {
        return Err(DigitsError::InsufficientDigits {
            requested: length,
            available: MAX_DIGITS,
        });
    }

    Ok(&PI_DIGITS[..length])
}

/// Convenience for callers that already hold an unsigned count
pub fn prefix(length: usize) -> Result<&'static str, DigitsError> {
    let length = i64::try_from(length).map_err(|_| DigitsError::InsufficientDigits {
        requested: length,
        available: MAX_DIGITS,
    })?;
    digits(length)
}
