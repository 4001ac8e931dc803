//! Status and role enums for stores.

use serde::{Deserialize, Serialize};

/// Operating status of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "store_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum StoreStatus {
    /// Open for business; products are visible.
    #[default]
    Active,
    /// Temporarily closed by the owner.
    Inactive,
    /// Closed by the platform.
    Suspended,
}

impl std::fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
            Self::Suspended => write!(f, "suspended"),
        }
    }
}

impl std::str::FromStr for StoreStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "suspended" => Ok(Self::Suspended),
            _ => Err(format!("invalid store status: {s}")),
        }
    }
}

/// A user's role within a store, carried on the membership pivot row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "store_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum StoreRole {
    /// Created the store; full control.
    Owner,
    /// Invited member.
    Member,
}

impl std::fmt::Display for StoreRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Owner => write!(f, "owner"),
            Self::Member => write!(f, "member"),
        }
    }
}

impl std::str::FromStr for StoreRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "member" => Ok(Self::Member),
            _ => Err(format!("invalid store role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_store_status_roundtrip() {
        for status in [
            StoreStatus::Active,
            StoreStatus::Inactive,
            StoreStatus::Suspended,
        ] {
            let parsed = StoreStatus::from_str(&status.to_string()).expect("roundtrip");
            assert_eq!(parsed, status);
        }
        assert!(StoreStatus::from_str("closed").is_err());
    }

    #[test]
    fn test_store_role_roundtrip() {
        assert_eq!(StoreRole::from_str("owner"), Ok(StoreRole::Owner));
        assert_eq!(StoreRole::from_str("member"), Ok(StoreRole::Member));
        assert!(StoreRole::from_str("admin").is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&StoreStatus::Active).expect("serialize");
        assert_eq!(json, "\"active\"");
        let json = serde_json::to_string(&StoreRole::Owner).expect("serialize");
        assert_eq!(json, "\"owner\"");
    }
}
