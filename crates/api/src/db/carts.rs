//! Cart repository. Every query is scoped by the owning user.

use sqlx::PgPool;

use gerai_core::{CartItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::CartItem;

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

const CART_COLUMNS: &str = "id, product_id, quantity, user_id, created_at, updated_at";

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Put a product into the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartItem, RepositoryError> {
        let sql = format!(
            "INSERT INTO cart_items (product_id, quantity, user_id) \
             VALUES ($1, $2, $3) RETURNING {CART_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, CartItem>(&sql)
            .bind(product_id)
            .bind(quantity)
            .bind(user_id)
            .fetch_one(self.pool)
            .await?)
    }

    /// List the user's cart items, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_user(&self, user_id: UserId) -> Result<Vec<CartItem>, RepositoryError> {
        let sql = format!(
            "SELECT {CART_COLUMNS} FROM cart_items WHERE user_id = $1 ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, CartItem>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?)
    }

    /// Adjust a cart line's quantity by `delta` (+1 / -1), scoped to the
    /// owning user. No floor is applied.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no cart item matches (id, user).
    pub async fn adjust_quantity(
        &self,
        id: CartItemId,
        user_id: UserId,
        delta: i32,
    ) -> Result<CartItem, RepositoryError> {
        let sql = format!(
            "UPDATE cart_items SET quantity = quantity + $3, updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 RETURNING {CART_COLUMNS}"
        );
        sqlx::query_as::<_, CartItem>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(delta)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Remove a cart line, scoped to the owning user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no cart item matches (id, user).
    pub async fn delete(&self, id: CartItemId, user_id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
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
