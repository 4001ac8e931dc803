//! Favorites repository. Every query is scoped by the owning user.

use sqlx::PgPool;

use gerai_core::{FavoriteId, ProductId, UserId};

use super::RepositoryError;
use crate::models::Favorite;

/// Repository for favorite database operations.
pub struct FavoriteRepository<'a> {
    pool: &'a PgPool,
}

const FAVORITE_COLUMNS: &str = "id, product_id, user_id, created_at, updated_at";

impl<'a> FavoriteRepository<'a> {
    /// Create a new favorite repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Mark a product as a favorite.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the product is already a
    /// favorite of this user.
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Favorite, RepositoryError> {
        let sql = format!(
            "INSERT INTO favorites (product_id, user_id) VALUES ($1, $2) \
             RETURNING {FAVORITE_COLUMNS}"
        );
        sqlx::query_as::<_, Favorite>(&sql)
            .bind(product_id)
            .bind(user_id)
            .fetch_one(self.pool)
            .await
            .map_err(|e| RepositoryError::from_insert(e, "product already in favorites"))
    }

    /// List the user's favorites, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Favorite>, RepositoryError> {
        let sql = format!(
            "SELECT {FAVORITE_COLUMNS} FROM favorites WHERE user_id = $1 ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, Favorite>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?)
    }

    /// Remove a favorite, scoped to the owning user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no favorite matches (id, user).
    pub async fn delete(&self, id: FavoriteId, user_id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM favorites WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
