//! Address repository. Every query is scoped by the owning user.

use sqlx::PgPool;

use gerai_core::{AddressId, UserId};

use super::RepositoryError;
use crate::models::Address;

/// Fields for a new address.
pub struct NewAddress<'a> {
    pub name: &'a str,
    pub phone_number: &'a str,
    pub full_address: &'a str,
    pub district: Option<&'a str>,
    pub city: Option<&'a str>,
    pub province: Option<&'a str>,
    pub country: Option<&'a str>,
    pub coordinate: Option<&'a str>,
}

/// Optional field updates for an existing address.
#[derive(Default)]
pub struct UpdateAddress<'a> {
    pub name: Option<&'a str>,
    pub phone_number: Option<&'a str>,
    pub full_address: Option<&'a str>,
    pub district: Option<&'a str>,
    pub city: Option<&'a str>,
    pub province: Option<&'a str>,
    pub country: Option<&'a str>,
    pub coordinate: Option<&'a str>,
}

/// Repository for address database operations.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

const ADDRESS_COLUMNS: &str = "id, name, phone_number, full_address, district, city, province, \
     country, coordinate, user_id, created_at, updated_at";

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an address for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        user_id: UserId,
        new: &NewAddress<'_>,
    ) -> Result<Address, RepositoryError> {
        let sql = format!(
            "INSERT INTO addresses \
             (name, phone_number, full_address, district, city, province, country, coordinate, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {ADDRESS_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Address>(&sql)
            .bind(new.name)
            .bind(new.phone_number)
            .bind(new.full_address)
            .bind(new.district)
            .bind(new.city)
            .bind(new.province)
            .bind(new.country)
            .bind(new.coordinate)
            .bind(user_id)
            .fetch_one(self.pool)
            .await?)
    }

    /// Get one of the user's addresses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        id: AddressId,
        user_id: UserId,
    ) -> Result<Option<Address>, RepositoryError> {
        let sql = format!("SELECT {ADDRESS_COLUMNS} FROM addresses WHERE id = $1 AND user_id = $2");
        Ok(sqlx::query_as::<_, Address>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(self.pool)
            .await?)
    }

    /// List the user's addresses, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        let sql = format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE user_id = $1 ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, Address>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?)
    }

    /// Apply the provided field updates, scoped to the owning user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no address matches (id, user).
    pub async fn update(
        &self,
        id: AddressId,
        user_id: UserId,
        update: &UpdateAddress<'_>,
    ) -> Result<Address, RepositoryError> {
        let sql = format!(
            "UPDATE addresses SET \
             name = COALESCE($3, name), \
             phone_number = COALESCE($4, phone_number), \
             full_address = COALESCE($5, full_address), \
             district = COALESCE($6, district), \
             city = COALESCE($7, city), \
             province = COALESCE($8, province), \
             country = COALESCE($9, country), \
             coordinate = COALESCE($10, coordinate), \
             updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 RETURNING {ADDRESS_COLUMNS}"
        );
        sqlx::query_as::<_, Address>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(update.name)
            .bind(update.phone_number)
            .bind(update.full_address)
            .bind(update.district)
            .bind(update.city)
            .bind(update.province)
            .bind(update.country)
            .bind(update.coordinate)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete an address, scoped to the owning user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no address matches (id, user).
    pub async fn delete(&self, id: AddressId, user_id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1 AND user_id = $2")
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
