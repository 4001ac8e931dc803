//! Order repository.
//!
//! Order creation inserts the header row and all of its checkout lines in
//! one transaction; a mid-sequence failure leaves no partial order behind.

use rust_decimal::Decimal;
use sqlx::PgPool;

use gerai_core::{AddressId, OrderId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Checkout, Order};

/// Header fields for a new order.
pub struct NewOrder {
    pub total: Decimal,
    pub total_disc: Option<Decimal>,
    pub address_id: AddressId,
    pub payment_id: Option<i64>,
    pub disc_id: Option<i64>,
}

/// One line of a new order.
pub struct NewCheckout {
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
    pub total: Decimal,
    pub after_disc: Option<Decimal>,
    pub fee_shipping: Option<Decimal>,
    pub distance_shipping: Option<Decimal>,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

const ORDER_COLUMNS: &str = "id, total, total_disc, status, address_id, payment_id, disc_id, \
     user_id, created_at, updated_at";

const CHECKOUT_COLUMNS: &str = "id, quantity, status, price, total, after_disc, fee_shipping, \
     distance_shipping, product_id, user_id, order_id, created_at, updated_at";

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order header and its checkout lines in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails; nothing is
    /// committed in that case.
    pub async fn create_with_checkouts(
        &self,
        user_id: UserId,
        new: &NewOrder,
        lines: &[NewCheckout],
    ) -> Result<(Order, Vec<Checkout>), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO orders (total, total_disc, address_id, payment_id, disc_id, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {ORDER_COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(new.total)
            .bind(new.total_disc)
            .bind(new.address_id)
            .bind(new.payment_id)
            .bind(new.disc_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        let line_sql = format!(
            "INSERT INTO checkouts \
             (quantity, price, total, after_disc, fee_shipping, distance_shipping, \
              product_id, user_id, order_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {CHECKOUT_COLUMNS}"
        );
        let mut checkouts = Vec::with_capacity(lines.len());
        for line in lines {
            let checkout = sqlx::query_as::<_, Checkout>(&line_sql)
                .bind(line.quantity)
                .bind(line.price)
                .bind(line.total)
                .bind(line.after_disc)
                .bind(line.fee_shipping)
                .bind(line.distance_shipping)
                .bind(line.product_id)
                .bind(user_id)
                .bind(order.id)
                .fetch_one(&mut *tx)
                .await?;
            checkouts.push(checkout);
        }

        tx.commit().await?;
        Ok((order, checkouts))
    }

    /// Get one of the user's orders with its checkout lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<Option<(Order, Vec<Checkout>)>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND user_id = $2");
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(self.pool)
            .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        let line_sql =
            format!("SELECT {CHECKOUT_COLUMNS} FROM checkouts WHERE order_id = $1 ORDER BY id");
        let checkouts = sqlx::query_as::<_, Checkout>(&line_sql)
            .bind(order.id)
            .fetch_all(self.pool)
            .await?;

        Ok(Some((order, checkouts)))
    }

    /// List the user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, Order>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?)
    }
}
