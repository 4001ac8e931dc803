//! Authorization resolution.
//!
//! Two gates guard the API: a bearer token resolving to a user, and a
//! store-membership pivot row for store-scoped mutations. Handlers receive
//! the result as an explicit [`AuthContext`]; there is no ambient
//! currently-logged-in state.

use sqlx::PgPool;
use thiserror::Error;

use gerai_core::{Email, UserId};

use crate::db::{RepositoryError, StoreRepository, UserRepository};
use crate::models::{Store, StoreMembership};

/// The authenticated principal for one request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: UserId,
    pub email: Email,
    /// The bearer token the request presented.
    pub token: String,
}

/// Errors from authorization resolution.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// No Authorization header, or not a Bearer scheme.
    #[error("no bearer token presented")]
    MissingToken,

    /// The presented token matches no user.
    #[error("token not found")]
    TokenNotFound,

    /// Store lookup by contact email came up empty.
    #[error("store not found")]
    StoreNotFound,

    /// The user has no membership row for the store.
    #[error("user is not a member of the store")]
    NotAMember,

    /// Database failure during resolution.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Resolve a bearer token to the user whose stored token matches it.
///
/// # Errors
///
/// Returns `AuthzError::MissingToken` for an absent/empty token and
/// `AuthzError::TokenNotFound` when no user matches.
pub async fn resolve_bearer(
    pool: &PgPool,
    token: Option<&str>,
) -> Result<AuthContext, AuthzError> {
    let token = match token {
        Some(t) if !t.is_empty() => t,
        _ => return Err(AuthzError::MissingToken),
    };

    let user = UserRepository::new(pool)
        .get_by_remember_token(token)
        .await?
        .ok_or(AuthzError::TokenNotFound)?;

    Ok(AuthContext {
        user_id: user.id,
        email: user.email,
        token: token.to_owned(),
    })
}

/// Resolve the store identified by its contact email and check the user
/// holds a membership row for it. The sole gate for store-scoped mutations.
///
/// # Errors
///
/// Returns `AuthzError::StoreNotFound` when no store has that email, and
/// `AuthzError::NotAMember` when the pivot row is absent.
pub async fn resolve_store_membership(
    pool: &PgPool,
    store_email: &str,
    user_id: UserId,
) -> Result<(Store, StoreMembership), AuthzError> {
    let repo = StoreRepository::new(pool);

    let store = repo
        .get_by_email(store_email)
        .await?
        .ok_or(AuthzError::StoreNotFound)?;

    let membership = repo
        .membership(user_id, store.id)
        .await?
        .ok_or(AuthzError::NotAMember)?;

    Ok((store, membership))
}
