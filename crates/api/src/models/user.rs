//! User model.

use chrono::{DateTime, Utc};
use gerai_core::{Email, UserId};

use crate::db::RepositoryError;

/// A registered user.
///
/// Rows accumulate state through the onboarding steps: registration writes
/// only `email` and `session_token`; verification, password, and profile
/// steps fill in the rest. Never serialized directly, handlers pick the
/// public fields into response payloads.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub phone_number: Option<String>,
    pub username: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub password_hash: Option<String>,
    pub email_verification_code: Option<String>,
    pub email_verify: bool,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub phone_number_verification_code: Option<String>,
    pub phone_number_verify: bool,
    pub phone_number_verified_at: Option<DateTime<Utc>>,
    /// Opaque pre-login correlator issued once at registration.
    pub session_token: String,
    /// Bearer token set at login, cleared at logout.
    pub remember_token: Option<String>,
    pub reset_token: Option<String>,
    pub token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw `users` row as stored; converted into [`User`] after the email
/// passes domain validation.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRow {
    pub id: UserId,
    pub email: String,
    pub phone_number: Option<String>,
    pub username: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub password_hash: Option<String>,
    pub email_verification_code: Option<String>,
    pub email_verify: bool,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub phone_number_verification_code: Option<String>,
    pub phone_number_verify: bool,
    pub phone_number_verified_at: Option<DateTime<Utc>>,
    pub session_token: String,
    pub remember_token: Option<String>,
    pub reset_token: Option<String>,
    pub token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            email,
            phone_number: row.phone_number,
            username: row.username,
            firstname: row.firstname,
            lastname: row.lastname,
            password_hash: row.password_hash,
            email_verification_code: row.email_verification_code,
            email_verify: row.email_verify,
            email_verified_at: row.email_verified_at,
            phone_number_verification_code: row.phone_number_verification_code,
            phone_number_verify: row.phone_number_verify,
            phone_number_verified_at: row.phone_number_verified_at,
            session_token: row.session_token,
            remember_token: row.remember_token,
            reset_token: row.reset_token,
            token_expires_at: row.token_expires_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl User {
    /// Public profile payload for response bodies. Verification codes,
    /// hashes, and tokens are never included.
    #[must_use]
    pub fn public_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "email": self.email.as_str(),
            "phone_number": self.phone_number,
            "username": self.username,
            "firstname": self.firstname,
            "lastname": self.lastname,
            "email_verify": self.email_verify,
            "phone_number_verify": self.phone_number_verify,
            "created_at": self.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> UserRow {
        UserRow {
            id: UserId::new(1),
            email: "a@example.com".to_owned(),
            phone_number: None,
            username: None,
            firstname: None,
            lastname: None,
            password_hash: Some("argon2-hash".to_owned()),
            email_verification_code: Some("123456".to_owned()),
            email_verify: false,
            email_verified_at: None,
            phone_number_verification_code: None,
            phone_number_verify: false,
            phone_number_verified_at: None,
            session_token: "tok".to_owned(),
            remember_token: Some("bearer".to_owned()),
            reset_token: None,
            token_expires_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_conversion() {
        let user = User::try_from(sample_row()).expect("valid row");
        assert_eq!(user.email.as_str(), "a@example.com");
        assert!(!user.email_verify);
    }

    #[test]
    fn test_row_conversion_rejects_bad_email() {
        let mut row = sample_row();
        row.email = "not-an-email".to_owned();
        assert!(matches!(
            User::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_public_json_has_no_secrets() {
        let user = User::try_from(sample_row()).expect("valid row");
        let json = user.public_json();
        let body = json.to_string();
        assert!(!body.contains("argon2-hash"));
        assert!(!body.contains("123456"));
        assert!(!body.contains("bearer"));
        assert_eq!(json["email"], "a@example.com");
    }
}
