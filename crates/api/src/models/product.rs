//! Product catalog models.

use chrono::{DateTime, Utc};
use gerai_core::{ProductId, ProductTypeId, StoreId};
use rust_decimal::Decimal;
use serde::Serialize;

/// A product listed by a store.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub categories: Option<String>,
    pub product_type: Option<String>,
    pub quantity: i32,
    pub image: Option<String>,
    pub store_id: StoreId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A variant of a product with its own price and stock.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductType {
    pub id: ProductTypeId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub quantity: i32,
    pub product_id: ProductId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
