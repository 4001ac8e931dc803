//! Favorite model.

use chrono::{DateTime, Utc};
use gerai_core::{FavoriteId, ProductId, UserId};
use serde::Serialize;

/// A product a user has marked as a favorite.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Favorite {
    pub id: FavoriteId,
    pub product_id: ProductId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
