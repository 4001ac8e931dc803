//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains a character that is not a digit (or leading +).
    #[error("phone number may only contain digits")]
    InvalidCharacter,
    /// The digit count is outside the accepted range.
    #[error("phone number must have between {min} and {max} digits")]
    BadLength {
        /// Minimum digit count.
        min: usize,
        /// Maximum digit count.
        max: usize,
    },
}

/// A phone number.
///
/// Accepts 10 to 15 digits with an optional leading `+`. The number is stored
/// as entered (minus nothing); no national formatting is attempted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Minimum number of digits.
    pub const MIN_DIGITS: usize = 10;
    /// Maximum number of digits.
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains non-digit characters
    /// (other than a single leading `+`), or has fewer than 10 or more than
    /// 15 digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        let digits = s.strip_prefix('+').unwrap_or(s);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(PhoneError::InvalidCharacter);
        }

        if digits.len() < Self::MIN_DIGITS || digits.len() > Self::MAX_DIGITS {
            return Err(PhoneError::BadLength {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Get the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(PhoneNumber::parse("081234567890").is_ok());
        assert!(PhoneNumber::parse("+6281234567890").is_ok());
        assert!(PhoneNumber::parse("1234567890").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(PhoneNumber::parse(""), Err(PhoneError::Empty)));
        assert!(matches!(
            PhoneNumber::parse("+"),
            Err(PhoneError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_parse_invalid_characters() {
        assert!(matches!(
            PhoneNumber::parse("0812-345-678"),
            Err(PhoneError::InvalidCharacter)
        ));
        assert!(matches!(
            PhoneNumber::parse("not a phone"),
            Err(PhoneError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_parse_length_bounds() {
        // 9 digits: too short
        assert!(matches!(
            PhoneNumber::parse("123456789"),
            Err(PhoneError::BadLength { .. })
        ));
        // 16 digits: too long
        assert!(matches!(
            PhoneNumber::parse("1234567890123456"),
            Err(PhoneError::BadLength { .. })
        ));
        // Boundaries are inclusive
        assert!(PhoneNumber::parse("1234567890").is_ok());
        assert!(PhoneNumber::parse("123456789012345").is_ok());
    }
}
