//! Credential lifecycle service.
//!
//! Orchestrates the onboarding progression (register, email/phone
//! verification, password, profile), login/logout, and the password reset
//! flow. All persistence goes through [`UserRepository`]; every step is a
//! single-statement mutation so interrupted requests never leave a
//! half-updated user row.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Duration, Utc};
use rand::distr::{Alphanumeric, SampleString};
use sqlx::PgPool;

use gerai_core::Email;

use crate::db::{RepositoryError, UserRepository};
use crate::models::User;
use crate::services::email::{EmailService, generate_verification_code};

/// Length of session, bearer, and reset tokens.
const TOKEN_LENGTH: usize = 60;

/// How long a password-reset token stays valid.
const RESET_TOKEN_TTL_MINUTES: i64 = 30;

/// Credential lifecycle service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    mailer: &'a EmailService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, mailer: &'a EmailService) -> Self {
        Self {
            users: UserRepository::new(pool),
            mailer,
        }
    }

    /// Register a user with only an email. Issues the session token that
    /// correlates all following onboarding steps; it is never rotated.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmailAlreadyRegistered` if the email exists.
    pub async fn register(&self, email: &Email) -> Result<User, AuthError> {
        let session_token = generate_token();

        let user = self
            .users
            .create(email, &session_token)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailAlreadyRegistered,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Generate and store a 6-digit email verification code, then mail it.
    /// Replaces any pending code.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmailNotRegistered` if no user has this email.
    pub async fn send_email_code(&self, email: &str) -> Result<(), AuthError> {
        let user = self
            .users
            .get_by_email(email)
            .await?
            .ok_or(AuthError::EmailNotRegistered)?;

        let code = generate_verification_code();
        self.users.store_email_code(user.id, &code).await?;
        self.mailer
            .send_verification_code(user.email.as_str(), &code)
            .await?;

        Ok(())
    }

    /// Check the submitted code against the stored one and mark the email
    /// verified. Re-verification after success is allowed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmailOrSession` when the (email, session)
    /// pair matches no user, `AuthError::EmailCodeMismatch` on a wrong code.
    pub async fn verify_email(
        &self,
        email: &str,
        code: &str,
        session_token: &str,
    ) -> Result<User, AuthError> {
        let user = self
            .users
            .get_by_email_and_session(email, session_token)
            .await?
            .ok_or(AuthError::InvalidEmailOrSession)?;

        if user.email_verification_code.as_deref() != Some(code) {
            return Err(AuthError::EmailCodeMismatch);
        }

        self.users.mark_email_verified(user.id).await?;
        Ok(user)
    }

    /// Record the phone number, generate and store its verification code,
    /// then mail the code to the user's registered email address.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmailNotRegistered` if no user has this email.
    pub async fn send_phone_code(&self, email: &str, phone_number: &str) -> Result<(), AuthError> {
        let user = self
            .users
            .get_by_email(email)
            .await?
            .ok_or(AuthError::EmailNotRegistered)?;

        let code = generate_verification_code();
        self.users
            .store_phone_number_and_code(user.id, phone_number, &code)
            .await?;
        self.mailer
            .send_verification_code(user.email.as_str(), &code)
            .await?;

        Ok(())
    }

    /// Check the submitted code against the stored one and mark the phone
    /// number verified.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidPhoneOrSession` when the (phone, session)
    /// pair matches no user, `AuthError::PhoneCodeMismatch` on a wrong code.
    pub async fn verify_phone(
        &self,
        phone_number: &str,
        code: &str,
        session_token: &str,
    ) -> Result<User, AuthError> {
        let user = self
            .users
            .get_by_phone_and_session(phone_number, session_token)
            .await?
            .ok_or(AuthError::InvalidPhoneOrSession)?;

        if user.phone_number_verification_code.as_deref() != Some(code) {
            return Err(AuthError::PhoneCodeMismatch);
        }

        self.users.mark_phone_verified(user.id).await?;
        Ok(user)
    }

    /// Store the argon2 hash of the chosen password. The raw password is
    /// never persisted.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidSession` if the session token matches no
    /// user.
    pub async fn add_password(
        &self,
        session_token: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let user = self
            .users
            .get_by_session(session_token)
            .await?
            .ok_or(AuthError::InvalidSession)?;

        let hash = hash_password(password)?;
        self.users.set_password_hash(user.id, &hash).await?;
        Ok(user)
    }

    /// Fill in the profile fields. Username uniqueness is not enforced.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidSession` if the session token matches no
    /// user.
    pub async fn add_information(
        &self,
        session_token: &str,
        firstname: &str,
        lastname: &str,
        username: &str,
    ) -> Result<User, AuthError> {
        let user = self
            .users
            .get_by_session(session_token)
            .await?
            .ok_or(AuthError::InvalidSession)?;

        self.users
            .set_profile(user.id, firstname, lastname, username)
            .await?;
        Ok(user)
    }

    /// Verify credentials and issue a fresh bearer token, overwriting any
    /// prior one. Single active session per user, last writer wins.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmailNotRegistered` for an unknown email and
    /// `AuthError::PasswordIncorrect` on a failed hash check.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let user = self
            .users
            .get_by_email(email)
            .await?
            .ok_or(AuthError::EmailNotRegistered)?;

        let hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::PasswordIncorrect)?;
        verify_password(password, hash)?;

        let token = generate_token();
        self.users.set_remember_token(user.id, &token).await?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok((user, token))
    }

    /// Revoke the caller's bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the update fails.
    pub async fn logout(&self, user_id: gerai_core::UserId) -> Result<(), AuthError> {
        self.users.clear_remember_token(user_id).await?;
        tracing::info!(user_id = %user_id, "User logged out");
        Ok(())
    }

    /// Issue a 30-minute reset token and mail it. The login session stays
    /// valid.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmailNotRegistered` if no user has this email.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        let user = self
            .users
            .get_by_email(email)
            .await?
            .ok_or(AuthError::EmailNotRegistered)?;

        let token = generate_token();
        let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
        self.users.set_reset_token(user.id, &token, expires_at).await?;
        self.mailer
            .send_password_reset(user.email.as_str(), &token)
            .await?;

        Ok(())
    }

    /// Complete a password reset. The expiry is checked here, at token use
    /// time; the new hash write and token cleanup are one statement.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidResetToken` for an unknown token and
    /// `AuthError::ResetTokenExpired` past the 30-minute window.
    pub async fn reset_password(&self, token: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .users
            .get_by_reset_token(token)
            .await?
            .ok_or(AuthError::InvalidResetToken)?;

        if reset_token_expired(user.token_expires_at, Utc::now()) {
            return Err(AuthError::ResetTokenExpired);
        }

        let hash = hash_password(password)?;
        self.users.complete_password_reset(user.id, &hash).await?;
        Ok(user)
    }
}

/// Generate an opaque 60-character alphanumeric token.
#[must_use]
pub fn generate_token() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), TOKEN_LENGTH)
}

/// Whether a reset token is unusable: no expiry recorded, or expiry passed.
fn reset_token_expired(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    expires_at.is_none_or(|at| at <= now)
}

/// Hash a password using Argon2id. Also used for store passwords.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::PasswordIncorrect)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::PasswordIncorrect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_token_unique() {
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse battery").expect("hash");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::PasswordIncorrect)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::PasswordIncorrect)
        ));
    }

    #[test]
    fn test_reset_token_expiry() {
        let now = Utc::now();
        assert!(reset_token_expired(None, now));
        assert!(reset_token_expired(Some(now - Duration::seconds(1)), now));
        assert!(reset_token_expired(Some(now), now));
        assert!(!reset_token_expired(
            Some(now + Duration::minutes(RESET_TOKEN_TTL_MINUTES)),
            now
        ));
    }
}
