//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::email::MailError;

/// Errors that can occur during credential lifecycle operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Registration attempted with an email that already exists.
    #[error("email already registered")]
    EmailAlreadyRegistered,

    /// A lookup by email found no user.
    #[error("email not registered")]
    EmailNotRegistered,

    /// A lookup by session token found no user.
    #[error("invalid session token")]
    InvalidSession,

    /// The (email, session token) pair matched no user.
    #[error("invalid email or session token")]
    InvalidEmailOrSession,

    /// The (phone number, session token) pair matched no user.
    #[error("invalid phone number or session token")]
    InvalidPhoneOrSession,

    /// Submitted email verification code does not match the stored one.
    #[error("email verification code mismatch")]
    EmailCodeMismatch,

    /// Submitted phone verification code does not match the stored one.
    #[error("phone verification code mismatch")]
    PhoneCodeMismatch,

    /// Password check failed at login.
    #[error("password not correct")]
    PasswordIncorrect,

    /// The presented reset token matched no user.
    #[error("invalid reset token")]
    InvalidResetToken,

    /// The reset token's expiry has passed.
    #[error("reset token expired")]
    ResetTokenExpired,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Mail delivery error.
    #[error("mail error: {0}")]
    Mail(#[from] MailError),
}
