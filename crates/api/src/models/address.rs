//! Address book model.

use chrono::{DateTime, Utc};
use gerai_core::{AddressId, UserId};
use serde::Serialize;

/// A shipping address owned by a user.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Address {
    pub id: AddressId,
    /// Recipient name.
    pub name: String,
    pub phone_number: String,
    pub full_address: String,
    pub district: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
    /// Free-form "lat,lng" pair when the client supplies one.
    pub coordinate: Option<String>,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
