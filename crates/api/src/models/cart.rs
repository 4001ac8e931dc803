//! Cart model.

use chrono::{DateTime, Utc};
use gerai_core::{CartItemId, ProductId, UserId};
use serde::Serialize;

/// A product sitting in a user's cart.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
