//! Store and membership models.

use chrono::{DateTime, Utc};
use gerai_core::{StoreId, StoreRole, StoreStatus, UserId};
use serde::Serialize;

/// A seller store. Each user owns at most one.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub slug: String,
    /// Contact email, unique. Used for store login and membership lookup.
    pub email: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub rating: Option<i32>,
    pub total_buyer: Option<i64>,
    pub status: StoreStatus,
    pub store_type: Option<String>,
    pub category: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Pivot row asserting a user belongs to a store.
///
/// Presence of this row is the sole authorization gate for store-scoped
/// mutations. `token` is the store-scoped bearer issued by store login,
/// distinct from the user's global bearer token.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoreMembership {
    pub user_id: UserId,
    pub store_id: StoreId,
    pub role: StoreRole,
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_serialization_skips_hash() {
        let store = Store {
            id: StoreId::new(7),
            name: "Toko Maju".to_owned(),
            slug: "toko-maju".to_owned(),
            email: "toko@example.com".to_owned(),
            image: None,
            description: None,
            address: None,
            rating: None,
            total_buyer: Some(0),
            status: StoreStatus::Active,
            store_type: None,
            category: None,
            password_hash: "secret-hash".to_owned(),
            user_id: UserId::new(1),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&store).expect("serialize");
        assert_eq!(json["id"], 7);
        assert_eq!(json["status"], "active");
        assert!(json.get("password_hash").is_none());
    }
}
