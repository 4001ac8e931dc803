//! Store and membership repository.
//!
//! Store creation writes the store row and its owner pivot row in one
//! transaction so an interrupted registration never leaves an ownerless
//! store behind.

use sqlx::PgPool;

use gerai_core::{StoreId, StoreRole, StoreStatus, UserId};

use super::RepositoryError;
use crate::models::{Store, StoreMembership};

/// Fields for a new store.
pub struct NewStore<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub email: &'a str,
    pub description: Option<&'a str>,
    pub address: Option<&'a str>,
    pub store_type: Option<&'a str>,
    pub category: Option<&'a str>,
    pub password_hash: &'a str,
}

/// Optional field updates for an existing store.
#[derive(Default)]
pub struct UpdateStore<'a> {
    pub name: Option<&'a str>,
    pub slug: Option<&'a str>,
    pub description: Option<&'a str>,
    pub address: Option<&'a str>,
    pub store_type: Option<&'a str>,
    pub category: Option<&'a str>,
    pub image: Option<&'a str>,
}

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

const STORE_COLUMNS: &str = "id, name, slug, email, image, description, address, rating, \
     total_buyer, status, store_type, category, password_hash, user_id, created_at, updated_at";

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Whether the user already owns a store. One store per user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists_for_user(&self, user_id: UserId) -> Result<bool, RepositoryError> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM stores WHERE user_id = $1)")
                .bind(user_id)
                .fetch_one(self.pool)
                .await?;
        Ok(row.0)
    }

    /// Create a store and its owner membership row in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the store email or slug is
    /// already taken, or if the owner already has a store.
    pub async fn create_with_owner(
        &self,
        new: &NewStore<'_>,
        owner: UserId,
    ) -> Result<Store, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO stores \
             (name, slug, email, description, address, store_type, category, password_hash, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {STORE_COLUMNS}"
        );
        let store = sqlx::query_as::<_, Store>(&sql)
            .bind(new.name)
            .bind(new.slug)
            .bind(new.email)
            .bind(new.description)
            .bind(new.address)
            .bind(new.store_type)
            .bind(new.category)
            .bind(new.password_hash)
            .bind(owner)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                // Fires on a duplicate email or slug, or when a concurrent
                // registration for the same owner won the race past the
                // pre-insert check
                RepositoryError::from_insert(e, "store already registered or email/slug taken")
            })?;

        sqlx::query("INSERT INTO user_in_store (user_id, store_id, role) VALUES ($1, $2, $3)")
            .bind(owner)
            .bind(store.id)
            .bind(StoreRole::Owner)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(store)
    }

    /// Get a store by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let sql = format!("SELECT {STORE_COLUMNS} FROM stores WHERE id = $1");
        Ok(sqlx::query_as::<_, Store>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?)
    }

    /// Get a store by its contact email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Store>, RepositoryError> {
        let sql = format!("SELECT {STORE_COLUMNS} FROM stores WHERE email = $1");
        Ok(sqlx::query_as::<_, Store>(&sql)
            .bind(email)
            .fetch_optional(self.pool)
            .await?)
    }

    /// List all stores, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Store>, RepositoryError> {
        let sql = format!("SELECT {STORE_COLUMNS} FROM stores ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, Store>(&sql)
            .fetch_all(self.pool)
            .await?)
    }

    /// Apply the provided field updates, leaving absent fields untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store does not exist.
    pub async fn update(
        &self,
        id: StoreId,
        update: &UpdateStore<'_>,
    ) -> Result<Store, RepositoryError> {
        let sql = format!(
            "UPDATE stores SET \
             name = COALESCE($2, name), \
             slug = COALESCE($3, slug), \
             description = COALESCE($4, description), \
             address = COALESCE($5, address), \
             store_type = COALESCE($6, store_type), \
             category = COALESCE($7, category), \
             image = COALESCE($8, image), \
             updated_at = NOW() \
             WHERE id = $1 RETURNING {STORE_COLUMNS}"
        );
        sqlx::query_as::<_, Store>(&sql)
            .bind(id)
            .bind(update.name)
            .bind(update.slug)
            .bind(update.description)
            .bind(update.address)
            .bind(update.store_type)
            .bind(update.category)
            .bind(update.image)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Set the store status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store does not exist.
    pub async fn update_status(
        &self,
        id: StoreId,
        status: StoreStatus,
    ) -> Result<Store, RepositoryError> {
        let sql = format!(
            "UPDATE stores SET status = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {STORE_COLUMNS}"
        );
        sqlx::query_as::<_, Store>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Get the membership pivot row for a (user, store) pair.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn membership(
        &self,
        user_id: UserId,
        store_id: StoreId,
    ) -> Result<Option<StoreMembership>, RepositoryError> {
        Ok(sqlx::query_as::<_, StoreMembership>(
            "SELECT user_id, store_id, role, token FROM user_in_store \
             WHERE user_id = $1 AND store_id = $2",
        )
        .bind(user_id)
        .bind(store_id)
        .fetch_optional(self.pool)
        .await?)
    }

    /// Issue a store-scoped token into the membership row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the membership row does not
    /// exist.
    pub async fn set_member_token(
        &self,
        user_id: UserId,
        store_id: StoreId,
        token: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE user_in_store SET token = $3 WHERE user_id = $1 AND store_id = $2",
        )
        .bind(user_id)
        .bind(store_id)
        .bind(token)
        .execute(self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Clear the store-scoped token from the membership row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the membership row does not
    /// exist.
    pub async fn clear_member_token(
        &self,
        user_id: UserId,
        store_id: StoreId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE user_in_store SET token = NULL WHERE user_id = $1 AND store_id = $2",
        )
        .bind(user_id)
        .bind(store_id)
        .execute(self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
