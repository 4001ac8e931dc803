//! Order and checkout-line models.

use chrono::{DateTime, Utc};
use gerai_core::{AddressId, CheckoutId, OrderId, ProductId, UserId};
use rust_decimal::Decimal;
use serde::Serialize;

/// An order header. Totals are denormalized from the checkout lines at
/// creation time.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub total: Decimal,
    pub total_disc: Option<Decimal>,
    pub status: i16,
    pub address_id: AddressId,
    pub payment_id: Option<i64>,
    pub disc_id: Option<i64>,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One product line within an order.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Checkout {
    pub id: CheckoutId,
    pub quantity: i32,
    pub status: i16,
    pub price: Decimal,
    pub total: Decimal,
    pub after_disc: Option<Decimal>,
    pub fee_shipping: Option<Decimal>,
    pub distance_shipping: Option<Decimal>,
    pub product_id: ProductId,
    pub user_id: UserId,
    pub order_id: OrderId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
