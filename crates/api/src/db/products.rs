//! Product and product-type repository.

use rust_decimal::Decimal;
use sqlx::PgPool;

use gerai_core::{ProductId, ProductTypeId, StoreId};

use super::RepositoryError;
use crate::models::{Product, ProductType};

/// Fields for a new product.
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub description: Option<&'a str>,
    pub price: Decimal,
    pub categories: Option<&'a str>,
    pub product_type: Option<&'a str>,
    pub quantity: i32,
    pub image: Option<&'a str>,
    pub store_id: StoreId,
}

/// Optional field updates for an existing product.
#[derive(Default)]
pub struct UpdateProduct<'a> {
    pub name: Option<&'a str>,
    pub slug: Option<&'a str>,
    pub description: Option<&'a str>,
    pub price: Option<Decimal>,
    pub categories: Option<&'a str>,
    pub product_type: Option<&'a str>,
    pub quantity: Option<i32>,
    pub image: Option<&'a str>,
}

/// Fields for a new product variant.
pub struct NewProductType<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price: Decimal,
    pub quantity: i32,
    pub product_id: ProductId,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

const PRODUCT_COLUMNS: &str = "id, name, slug, description, price, categories, product_type, \
     quantity, image, store_id, created_at, updated_at";

const TYPE_COLUMNS: &str = "id, name, description, price, quantity, product_id, \
     created_at, updated_at";

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a product for a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is already taken.
    pub async fn create(&self, new: &NewProduct<'_>) -> Result<Product, RepositoryError> {
        let sql = format!(
            "INSERT INTO products \
             (name, slug, description, price, categories, product_type, quantity, image, store_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {PRODUCT_COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(new.name)
            .bind(new.slug)
            .bind(new.description)
            .bind(new.price)
            .bind(new.categories)
            .bind(new.product_type)
            .bind(new.quantity)
            .bind(new.image)
            .bind(new.store_id)
            .fetch_one(self.pool)
            .await
            .map_err(|e| RepositoryError::from_insert(e, "product slug already taken"))
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?)
    }

    /// List a store's products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_store(&self, store_id: StoreId) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE store_id = $1 ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(store_id)
            .fetch_all(self.pool)
            .await?)
    }

    /// Apply the provided field updates, scoped to the owning store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product matches (id, store).
    pub async fn update(
        &self,
        id: ProductId,
        store_id: StoreId,
        update: &UpdateProduct<'_>,
    ) -> Result<Product, RepositoryError> {
        let sql = format!(
            "UPDATE products SET \
             name = COALESCE($3, name), \
             slug = COALESCE($4, slug), \
             description = COALESCE($5, description), \
             price = COALESCE($6, price), \
             categories = COALESCE($7, categories), \
             product_type = COALESCE($8, product_type), \
             quantity = COALESCE($9, quantity), \
             image = COALESCE($10, image), \
             updated_at = NOW() \
             WHERE id = $1 AND store_id = $2 RETURNING {PRODUCT_COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(store_id)
            .bind(update.name)
            .bind(update.slug)
            .bind(update.description)
            .bind(update.price)
            .bind(update.categories)
            .bind(update.product_type)
            .bind(update.quantity)
            .bind(update.image)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete a product, scoped to the owning store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product matches (id, store).
    pub async fn delete(&self, id: ProductId, store_id: StoreId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1 AND store_id = $2")
            .bind(id)
            .bind(store_id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Insert a variant row for a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_type(
        &self,
        new: &NewProductType<'_>,
    ) -> Result<ProductType, RepositoryError> {
        let sql = format!(
            "INSERT INTO product_types (name, description, price, quantity, product_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {TYPE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, ProductType>(&sql)
            .bind(new.name)
            .bind(new.description)
            .bind(new.price)
            .bind(new.quantity)
            .bind(new.product_id)
            .fetch_one(self.pool)
            .await?)
    }

    /// Get a variant by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_type(
        &self,
        id: ProductTypeId,
    ) -> Result<Option<ProductType>, RepositoryError> {
        let sql = format!("SELECT {TYPE_COLUMNS} FROM product_types WHERE id = $1");
        Ok(sqlx::query_as::<_, ProductType>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?)
    }

    /// List a product's variants.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_types(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductType>, RepositoryError> {
        let sql = format!(
            "SELECT {TYPE_COLUMNS} FROM product_types WHERE product_id = $1 ORDER BY id"
        );
        Ok(sqlx::query_as::<_, ProductType>(&sql)
            .bind(product_id)
            .fetch_all(self.pool)
            .await?)
    }

    /// Apply variant field updates.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the variant does not exist.
    pub async fn update_type(
        &self,
        id: ProductTypeId,
        name: Option<&str>,
        description: Option<&str>,
        price: Option<Decimal>,
        quantity: Option<i32>,
    ) -> Result<ProductType, RepositoryError> {
        let sql = format!(
            "UPDATE product_types SET \
             name = COALESCE($2, name), \
             description = COALESCE($3, description), \
             price = COALESCE($4, price), \
             quantity = COALESCE($5, quantity), \
             updated_at = NOW() \
             WHERE id = $1 RETURNING {TYPE_COLUMNS}"
        );
        sqlx::query_as::<_, ProductType>(&sql)
            .bind(id)
            .bind(name)
            .bind(description)
            .bind(price)
            .bind(quantity)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete a variant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the variant does not exist.
    pub async fn delete_type(&self, id: ProductTypeId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM product_types WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
