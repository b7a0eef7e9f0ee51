use crate::digits::{DEFAULT_LENGTH, MAX_DIGITS};
use crate::error::ValidationError;
use std::num::IntErrorKind;

/// A user's version of π split at the decimal point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub integer: String,
    pub fraction: String,
}

impl Candidate {
    /// Accepts `digits` or `digits.digits`; anything else (signs, spaces,
    /// separators, a second point, a dangling point) is rejected.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let (integer, fraction) = match input.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (input, None),
        };

        let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

        if !all_digits(integer) {
            return Err(ValidationError::InvalidInput);
        }
        if let Some(fraction) = fraction {
            if !all_digits(fraction) {
                return Err(ValidationError::InvalidInput);
            }
        }

        Ok(Self {
            integer: integer.to_string(),
            fraction: fraction.unwrap_or_default().to_string(),
        })
    }

    pub fn integer_ok(&self) -> bool {
        self.integer == "3"
    }

    /// Decimals to score against when no explicit length was asked for
    pub fn decimals(&self) -> usize {
        self.fraction.len().max(1)
    }
}

/// Parses the `-p` argument. Zero or negative selects the default length.
pub fn parse_length(input: &str) -> Result<usize, ValidationError> {
    let length: i64 = match input.trim().parse() {
        Ok(n) => n,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => {
                return Err(ValidationError::TooLarge { max: MAX_DIGITS })
            }
            IntErrorKind::NegOverflow => return Ok(DEFAULT_LENGTH),
            _ => return Err(ValidationError::NotAnInteger),
        },
    };

    if length <= 0 {
        return Ok(DEFAULT_LENGTH);
    }

    let length = length as u64;
    if length > MAX_DIGITS as u64 {
        return Err(ValidationError::TooLarge { max: MAX_DIGITS });
    }
    Ok(length as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_valid_candidates() {
        let c = Candidate::parse("3.14159").unwrap();
        assert_eq!(c.integer, "3");
        assert_eq!(c.fraction, "14159");
        assert!(c.integer_ok());

        let c = Candidate::parse("3").unwrap();
        assert_eq!(c.fraction, "");
        assert_eq!(c.decimals(), 1);

        let c = Candidate::parse("4.1").unwrap();
        assert!(!c.integer_ok());
    }

    #[test]
    fn test_parse_invalid_candidates() {
        for input in ["", "abc", "3.14.15", "-3.14", "3,141", "3.", ".14", "3.14a", " 3.14"] {
            assert_matches!(
                Candidate::parse(input),
                Err(ValidationError::InvalidInput),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_length() {
        assert_eq!(parse_length("15"), Ok(15));
        assert_eq!(parse_length("100"), Ok(100));
        assert_eq!(parse_length("0"), Ok(DEFAULT_LENGTH));
        assert_eq!(parse_length("-4"), Ok(DEFAULT_LENGTH));
        assert_eq!(parse_length("5000"), Ok(5000));
        assert_eq!(parse_length("-99999999999999999999"), Ok(DEFAULT_LENGTH));
    }

    #[test]
    fn test_parse_length_errors() {
        assert_eq!(parse_length("abc"), Err(ValidationError::NotAnInteger));
        assert_eq!(parse_length("1.5"), Err(ValidationError::NotAnInteger));
        assert_eq!(
            parse_length("5001"),
            Err(ValidationError::TooLarge { max: MAX_DIGITS })
        );
        assert_eq!(
            parse_length("99999999999999999999"),
            Err(ValidationError::TooLarge { max: MAX_DIGITS })
        );
    }
}
