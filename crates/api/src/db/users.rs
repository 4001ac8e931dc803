//! User repository.
//!
//! Every credential-lifecycle mutation lands here as a single `UPDATE` so
//! concurrent requests never observe a half-updated row. Token issuance is a
//! plain overwrite (single active session, last writer wins).

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use gerai_core::{Email, UserId};

use super::RepositoryError;
use crate::models::user::{User, UserRow};

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

const USER_COLUMNS: &str = "id, email, phone_number, username, firstname, lastname, \
     password_hash, email_verification_code, email_verify, email_verified_at, \
     phone_number_verification_code, phone_number_verify, phone_number_verified_at, \
     session_token, remember_token, reset_token, token_expires_at, created_at, updated_at";

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a user with only an email and a fresh session token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    pub async fn create(
        &self,
        email: &Email,
        session_token: &str,
    ) -> Result<User, RepositoryError> {
        let sql = format!(
            "INSERT INTO users (email, session_token) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email.as_str())
            .bind(session_token)
            .fetch_one(self.pool)
            .await
            .map_err(|e| RepositoryError::from_insert(e, "email already registered"))?;

        User::try_from(row)
    }

    async fn fetch_one_where(
        &self,
        predicate: &str,
        bindings: &[&str],
    ) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {predicate}");
        let mut query = sqlx::query_as::<_, UserRow>(&sql);
        for binding in bindings {
            query = query.bind(*binding);
        }
        let row = query.fetch_optional(self.pool).await?;
        row.map(User::try_from).transpose()
    }

    /// Get a user by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        self.fetch_one_where("email = $1", &[email]).await
    }

    /// Get a user by the (email, session token) onboarding pair.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email_and_session(
        &self,
        email: &str,
        session_token: &str,
    ) -> Result<Option<User>, RepositoryError> {
        self.fetch_one_where("email = $1 AND session_token = $2", &[email, session_token])
            .await
    }

    /// Get a user by the (phone number, session token) pair.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_phone_and_session(
        &self,
        phone_number: &str,
        session_token: &str,
    ) -> Result<Option<User>, RepositoryError> {
        self.fetch_one_where(
            "phone_number = $1 AND session_token = $2",
            &[phone_number, session_token],
        )
        .await
    }

    /// Get a user by session token alone (password and profile steps).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_session(
        &self,
        session_token: &str,
    ) -> Result<Option<User>, RepositoryError> {
        self.fetch_one_where("session_token = $1", &[session_token])
            .await
    }

    /// Get a user by their active bearer token. Empty stored tokens never
    /// match.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_remember_token(
        &self,
        token: &str,
    ) -> Result<Option<User>, RepositoryError> {
        self.fetch_one_where("remember_token = $1 AND remember_token <> ''", &[token])
            .await
    }

    /// Get a user by their password-reset token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_reset_token(&self, token: &str) -> Result<Option<User>, RepositoryError> {
        self.fetch_one_where("reset_token = $1", &[token]).await
    }

    async fn execute_one(
        &self,
        query: sqlx::query::Query<'_, sqlx::Postgres, sqlx::postgres::PgArguments>,
    ) -> Result<(), RepositoryError> {
        let result = query.execute(self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Store a pending email verification code, replacing any prior one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn store_email_code(&self, id: UserId, code: &str) -> Result<(), RepositoryError> {
        self.execute_one(
            sqlx::query(
                "UPDATE users SET email_verification_code = $2, updated_at = NOW() WHERE id = $1",
            )
            .bind(id)
            .bind(code),
        )
        .await
    }

    /// Record the user's phone number alongside the pending code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn store_phone_number_and_code(
        &self,
        id: UserId,
        phone_number: &str,
        code: &str,
    ) -> Result<(), RepositoryError> {
        self.execute_one(
            sqlx::query(
                "UPDATE users SET phone_number = $2, phone_number_verification_code = $3, \
             updated_at = NOW() WHERE id = $1",
            )
            .bind(id)
            .bind(phone_number)
            .bind(code),
        )
        .await
    }

    /// Flip the email-verified flag and timestamp in one statement.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn mark_email_verified(&self, id: UserId) -> Result<(), RepositoryError> {
        self.execute_one(
            sqlx::query(
                "UPDATE users SET email_verify = TRUE, email_verified_at = NOW(), \
             updated_at = NOW() WHERE id = $1",
            )
            .bind(id),
        )
        .await
    }

    /// Flip the phone-verified flag and timestamp in one statement.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn mark_phone_verified(&self, id: UserId) -> Result<(), RepositoryError> {
        self.execute_one(
            sqlx::query(
                "UPDATE users SET phone_number_verify = TRUE, phone_number_verified_at = NOW(), \
             updated_at = NOW() WHERE id = $1",
            )
            .bind(id),
        )
        .await
    }

    /// Store the password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn set_password_hash(&self, id: UserId, hash: &str) -> Result<(), RepositoryError> {
        self.execute_one(
            sqlx::query(
                "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
            )
            .bind(id)
            .bind(hash),
        )
        .await
    }

    /// Update profile fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn set_profile(
        &self,
        id: UserId,
        firstname: &str,
        lastname: &str,
        username: &str,
    ) -> Result<(), RepositoryError> {
        self.execute_one(
            sqlx::query(
                "UPDATE users SET firstname = $2, lastname = $3, username = $4, \
             updated_at = NOW() WHERE id = $1",
            )
            .bind(id)
            .bind(firstname)
            .bind(lastname)
            .bind(username),
        )
        .await
    }

    /// Persist a new bearer token, replacing any prior one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn set_remember_token(&self, id: UserId, token: &str) -> Result<(), RepositoryError> {
        self.execute_one(
            sqlx::query(
                "UPDATE users SET remember_token = $2, updated_at = NOW() WHERE id = $1",
            )
            .bind(id)
            .bind(token),
        )
        .await
    }

    /// Revoke the stored bearer token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn clear_remember_token(&self, id: UserId) -> Result<(), RepositoryError> {
        self.execute_one(
            sqlx::query(
                "UPDATE users SET remember_token = NULL, updated_at = NOW() WHERE id = $1",
            )
            .bind(id),
        )
        .await
    }

    /// Store a password-reset token with its expiry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn set_reset_token(
        &self,
        id: UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        self.execute_one(
            sqlx::query(
                "UPDATE users SET reset_token = $2, token_expires_at = $3, \
             updated_at = NOW() WHERE id = $1",
            )
            .bind(id)
            .bind(token)
            .bind(expires_at),
        )
        .await
    }

    /// Write the new password hash and consume the reset token in one
    /// statement.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn complete_password_reset(
        &self,
        id: UserId,
        hash: &str,
    ) -> Result<(), RepositoryError> {
        self.execute_one(
            sqlx::query(
                "UPDATE users SET password_hash = $2, reset_token = NULL, \
             token_expires_at = NULL, updated_at = NOW() WHERE id = $1",
            )
            .bind(id)
            .bind(hash),
        )
        .await
    }
}
