//! Six-digit verification code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`VerificationCode`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum CodeError {
    /// The code is not exactly six characters long.
    #[error("verification code must be exactly {len} digits")]
    BadLength {
        /// Required length.
        len: usize,
    },
    /// The code contains a non-digit character.
    #[error("verification code may only contain digits")]
    NotNumeric,
}

/// A six-digit numeric verification code, as sent by email for account
/// verification and stored on the user row until consumed.
///
/// Codes are compared as plain strings; generation lives with the mail
/// service, this type only guarantees the shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Number of digits in a code.
    pub const LENGTH: usize = 6;

    /// Parse a `VerificationCode` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly six ASCII digits.
    pub fn parse(s: &str) -> Result<Self, CodeError> {
        if s.len() != Self::LENGTH {
            return Err(CodeError::BadLength { len: Self::LENGTH });
        }
        if !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(CodeError::NotNumeric);
        }
        Ok(Self(s.to_owned()))
    }

    /// Get the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact comparison against a stored code value.
    #[must_use]
    pub fn matches(&self, stored: &str) -> bool {
        self.0 == stored
    }
}

impl fmt::Display for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(VerificationCode::parse("123456").is_ok());
        assert!(VerificationCode::parse("000000").is_ok());
    }

    #[test]
    fn test_parse_bad_length() {
        assert!(matches!(
            VerificationCode::parse("12345"),
            Err(CodeError::BadLength { .. })
        ));
        assert!(matches!(
            VerificationCode::parse("1234567"),
            Err(CodeError::BadLength { .. })
        ));
    }

    #[test]
    fn test_parse_not_numeric() {
        assert!(matches!(
            VerificationCode::parse("12a456"),
            Err(CodeError::NotNumeric)
        ));
    }

    #[test]
    fn test_matches() {
        let code = VerificationCode::parse("654321").expect("valid code");
        assert!(code.matches("654321"));
        assert!(!code.matches("123456"));
    }
}
