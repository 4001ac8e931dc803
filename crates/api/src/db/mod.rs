//! Database operations against `PostgreSQL`.
//!
//! # Tables
//!
//! - `users` - Identity, verification codes, password hash, tokens
//! - `stores` - Seller stores, one per user
//! - `user_in_store` - Store membership pivot with role and store-scoped token
//! - `products` / `product_types` - Catalog with variant rows
//! - `addresses` - User address book
//! - `cart_items` / `favorites` - Per-user owned records
//! - `orders` / `checkouts` - Order header and line rows
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p gerai-cli -- migrate
//! ```
//!
//! All repositories use the runtime query API (`sqlx::query` /
//! `sqlx::query_as`) so the crate builds without a live database.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod addresses;
pub mod carts;
pub mod favorites;
pub mod orders;
pub mod products;
pub mod stores;
pub mod users;

pub use addresses::AddressRepository;
pub use carts::CartRepository;
pub use favorites::FavoriteRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use stores::StoreRepository;
pub use users::UserRepository;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored value failed domain validation on the way out.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The targeted row does not exist.
    #[error("record not found")]
    NotFound,

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a unique-constraint violation onto `Conflict`, leaving every
    /// other database error as `Database`.
    pub(crate) fn from_insert(err: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23505") {
                return Self::Conflict(conflict_message.to_owned());
            }
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    use super::RepositoryError;

    /// Stand-in for a driver error carrying a `SQLSTATE` code.
    #[derive(Debug)]
    struct StubDatabaseError {
        code: Option<&'static str>,
    }

    impl fmt::Display for StubDatabaseError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("stub database error")
        }
    }

    impl StdError for StubDatabaseError {}

    impl sqlx::error::DatabaseError for StubDatabaseError {
        fn message(&self) -> &str {
            "stub database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            self.code.map(Cow::Borrowed)
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            if self.code == Some("23505") {
                sqlx::error::ErrorKind::UniqueViolation
            } else {
                sqlx::error::ErrorKind::Other
            }
        }
    }

    fn database_error(code: Option<&'static str>) -> sqlx::Error {
        sqlx::Error::Database(Box::new(StubDatabaseError { code }))
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let mapped =
            RepositoryError::from_insert(database_error(Some("23505")), "email already registered");
        match mapped {
            RepositoryError::Conflict(message) => {
                assert_eq!(message, "email already registered");
            }
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_other_sqlstate_codes_stay_database_errors() {
        // Foreign key violation
        assert!(matches!(
            RepositoryError::from_insert(database_error(Some("23503")), "unused"),
            RepositoryError::Database(_)
        ));
        // Driver error with no code at all
        assert!(matches!(
            RepositoryError::from_insert(database_error(None), "unused"),
            RepositoryError::Database(_)
        ));
    }

    #[test]
    fn test_non_database_errors_pass_through() {
        assert!(matches!(
            RepositoryError::from_insert(sqlx::Error::RowNotFound, "unused"),
            RepositoryError::Database(sqlx::Error::RowNotFound)
        ));
    }
}
