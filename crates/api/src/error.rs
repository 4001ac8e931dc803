//! Unified error handling with Sentry integration.
//!
//! Provides a unified `ApiError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<ApiResponse, ApiError>`; every variant renders as the standard
//! response envelope, never a bare error page.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::response::ApiResponse;
use crate::services::auth::AuthError;
use crate::services::authz::AuthzError;
use crate::services::email::MailError;
use crate::services::storage::StorageError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more request fields failed validation.
    #[error("validation failed")]
    Validation {
        /// One message per offending field, in field order.
        errors: BTreeMap<String, String>,
        /// Suggested client route after fixing the input.
        redirect: &'static str,
    },

    /// Missing or bad credential, token, or ownership.
    #[error("unauthorized: {message}")]
    Unauthorized {
        message: String,
        redirect: &'static str,
    },

    /// Requested entity does not exist.
    #[error("not found: {message}")]
    NotFound {
        message: String,
        redirect: &'static str,
    },

    /// Uniqueness or state conflict (e.g. duplicate email).
    #[error("conflict: {message}")]
    Conflict {
        message: String,
        redirect: &'static str,
    },

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Mail delivery failed.
    #[error("mail error: {0}")]
    Mail(#[from] MailError),

    /// File storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Anything else unexpected.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Database(_) | Self::Mail(_) | Self::Storage(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Database(_) | Self::Mail(_) | Self::Storage(_) | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();
        let envelope = match self {
            Self::Validation { errors, redirect } => ApiResponse::new(
                status,
                "Validation error",
                serde_json::json!({ "errors": errors }),
                Some(redirect),
            ),
            Self::Unauthorized { message, redirect }
            | Self::NotFound { message, redirect }
            | Self::Conflict { message, redirect } => {
                ApiResponse::new(status, message, serde_json::json!({}), Some(redirect))
            }
            Self::Database(_) | Self::Mail(_) | Self::Storage(_) | Self::Internal(_) => {
                // Diagnostic detail only outside release builds
                let data = if cfg!(debug_assertions) {
                    serde_json::json!({ "error": self.to_string() })
                } else {
                    serde_json::json!({})
                };
                ApiResponse::new(status, "Internal Server Error", data, None)
            }
        };

        envelope.into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailAlreadyRegistered => Self::Conflict {
                message: "Email already registered".to_owned(),
                redirect: "/login",
            },
            AuthError::EmailNotRegistered => Self::Unauthorized {
                message: "Email not registered".to_owned(),
                redirect: "/register",
            },
            AuthError::InvalidSession => Self::Unauthorized {
                message: "Invalid session".to_owned(),
                redirect: "/register",
            },
            AuthError::InvalidEmailOrSession => Self::Unauthorized {
                message: "Invalid email or session".to_owned(),
                redirect: "/register",
            },
            AuthError::InvalidPhoneOrSession => Self::Unauthorized {
                message: "Invalid phone number or session".to_owned(),
                redirect: "/register",
            },
            AuthError::EmailCodeMismatch => Self::Unauthorized {
                message: "Email verify code is not correct".to_owned(),
                redirect: "/verify-email",
            },
            AuthError::PhoneCodeMismatch => Self::Unauthorized {
                message: "Phone number verify code is not correct".to_owned(),
                redirect: "/verify-phone-number",
            },
            AuthError::PasswordIncorrect => Self::Unauthorized {
                message: "Password not correct".to_owned(),
                redirect: "/register",
            },
            AuthError::InvalidResetToken => Self::Unauthorized {
                message: "Reset token is not valid".to_owned(),
                redirect: "/forgot-password",
            },
            AuthError::ResetTokenExpired => Self::Unauthorized {
                message: "Reset token has expired".to_owned(),
                redirect: "/forgot-password",
            },
            AuthError::PasswordHash => Self::Internal("password hashing failed".to_owned()),
            AuthError::Repository(e) => Self::Database(e),
            AuthError::Mail(e) => Self::Mail(e),
        }
    }
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::MissingToken | AuthzError::TokenNotFound => Self::Unauthorized {
                message: "Token not found".to_owned(),
                redirect: "/login",
            },
            AuthzError::StoreNotFound => Self::Unauthorized {
                message: "Store not found".to_owned(),
                redirect: "/register",
            },
            AuthzError::NotAMember => Self::Unauthorized {
                message: "You are not a member of this store".to_owned(),
                redirect: "/register",
            },
            AuthzError::Repository(e) => Self::Database(e),
        }
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(ApiError::Validation {
                errors: BTreeMap::new(),
                redirect: "/register",
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(ApiError::Unauthorized {
                message: "no".to_owned(),
                redirect: "/login",
            }),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(ApiError::NotFound {
                message: "gone".to_owned(),
                redirect: "/",
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(ApiError::Conflict {
                message: "dup".to_owned(),
                redirect: "/",
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(ApiError::Internal("boom".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_error_mapping() {
        assert_eq!(
            get_status(ApiError::from(AuthError::EmailNotRegistered)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(ApiError::from(AuthError::EmailAlreadyRegistered)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(ApiError::from(AuthError::PasswordIncorrect)),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_authz_error_mapping() {
        assert_eq!(
            get_status(ApiError::from(AuthzError::TokenNotFound)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(ApiError::from(AuthzError::NotAMember)),
            StatusCode::UNAUTHORIZED
        );
    }
}
