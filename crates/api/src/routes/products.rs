//! Product and product-type endpoints.
//!
//! Every mutation resolves store membership from `store_email` first;
//! the pivot row is the only thing that authorizes touching the catalog.

use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use serde::Deserialize;
use serde_json::json;

use gerai_core::{ProductId, ProductTypeId};

use crate::db::products::{NewProduct, NewProductType, ProductRepository, UpdateProduct};
use crate::error::{ApiError, Result};
use crate::middleware::CurrentUser;
use crate::models::Product;
use crate::response::ApiResponse;
use crate::routes::slugify;
use crate::services::authz::resolve_store_membership;
use crate::state::AppState;
use crate::validate::{ApiJson, Validator};

/// Create the product routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_product))
        .route("/update/{id}", post(update_product))
        .route("/delete/{id}", post(delete_product))
        .route("/show/{id}", get(show_product))
        .route("/create/type", post(create_type))
        .route("/update/type/{id}", post(update_type))
        .route("/delete/type/{id}", post(delete_type))
}

fn product_not_found() -> ApiError {
    ApiError::NotFound {
        message: "Product not found".to_owned(),
        redirect: "/product",
    }
}

#[derive(Deserialize)]
struct CreateProductRequest {
    store_email: Option<String>,
    name: Option<String>,
    price: Option<String>,
    quantity: Option<String>,
    description: Option<String>,
    categories: Option<String>,
    product_type: Option<String>,
    image: Option<String>,
}

async fn create_product(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    ApiJson(form): ApiJson<CreateProductRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/product/create");
    let store_email = v.email("store_email", form.store_email.as_deref());
    let name = v.required("name", form.name.as_deref());
    let price = v.decimal("price", form.price.as_deref());
    let quantity = v.integer("quantity", form.quantity.as_deref());
    v.finish()?;
    let (store_email, name, price, quantity) = (
        store_email.expect("validated"),
        name.expect("validated"),
        price.expect("validated"),
        quantity.expect("validated"),
    );

    let (store, _membership) =
        resolve_store_membership(state.pool(), store_email.as_str(), auth.user_id).await?;

    // New image lands on disk before the row that references it
    let image_url = match form.image.as_deref() {
        Some(data) => Some(state.files().store("products", data).await?),
        None => None,
    };

    let product = ProductRepository::new(state.pool())
        .create(&NewProduct {
            name,
            slug: &slugify(name),
            description: form.description.as_deref(),
            price,
            categories: form.categories.as_deref(),
            product_type: form.product_type.as_deref(),
            quantity,
            image: image_url.as_deref(),
            store_id: store.id,
        })
        .await?;

    Ok(ApiResponse::created(
        "Product created successfully",
        json!({ "product": product }),
        Some("/product"),
    ))
}

#[derive(Deserialize)]
struct UpdateProductRequest {
    store_email: Option<String>,
    name: Option<String>,
    price: Option<String>,
    quantity: Option<String>,
    description: Option<String>,
    categories: Option<String>,
    product_type: Option<String>,
    image: Option<String>,
}

async fn update_product(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(id): Path<i64>,
    ApiJson(form): ApiJson<UpdateProductRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/product/update");
    let store_email = v.email("store_email", form.store_email.as_deref());
    let price = v.sometimes("price", form.price.as_deref(), Validator::decimal);
    let quantity = v.sometimes("quantity", form.quantity.as_deref(), Validator::integer);
    v.finish()?;
    let store_email = store_email.expect("validated");

    let (store, _membership) =
        resolve_store_membership(state.pool(), store_email.as_str(), auth.user_id).await?;

    let repo = ProductRepository::new(state.pool());
    let existing = repo
        .get(ProductId::new(id))
        .await?
        .filter(|p| p.store_id == store.id)
        .ok_or_else(product_not_found)?;

    // New image lands on disk before the row update; the old file goes away
    // only after the row commits
    let new_image = match form.image.as_deref() {
        Some(data) => Some(state.files().store("products", data).await?),
        None => None,
    };

    let slug = form.name.as_deref().map(slugify);
    let product = repo
        .update(
            existing.id,
            store.id,
            &UpdateProduct {
                name: form.name.as_deref(),
                slug: slug.as_deref(),
                description: form.description.as_deref(),
                price,
                categories: form.categories.as_deref(),
                product_type: form.product_type.as_deref(),
                quantity,
                image: new_image.as_deref(),
            },
        )
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => product_not_found(),
            other => ApiError::Database(other),
        })?;

    if new_image.is_some() {
        if let Some(old) = existing.image {
            state.files().delete(&old).await?;
        }
    }

    Ok(ApiResponse::ok(
        "Product updated successfully",
        json!({ "product": product }),
        Some("/product"),
    ))
}

#[derive(Deserialize)]
struct StoreEmailRequest {
    store_email: Option<String>,
}

async fn delete_product(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(id): Path<i64>,
    ApiJson(form): ApiJson<StoreEmailRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/product");
    let store_email = v.email("store_email", form.store_email.as_deref());
    v.finish()?;
    let store_email = store_email.expect("validated");

    let (store, _membership) =
        resolve_store_membership(state.pool(), store_email.as_str(), auth.user_id).await?;

    let repo = ProductRepository::new(state.pool());
    let existing = repo
        .get(ProductId::new(id))
        .await?
        .filter(|p| p.store_id == store.id)
        .ok_or_else(product_not_found)?;

    repo.delete(existing.id, store.id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => product_not_found(),
            other => ApiError::Database(other),
        })?;

    // Row is gone; now the image file can follow
    if let Some(image) = existing.image {
        state.files().delete(&image).await?;
    }

    Ok(ApiResponse::ok(
        "Product deleted successfully",
        json!({}),
        Some("/product"),
    ))
}

async fn show_product(
    State(state): State<AppState>,
    CurrentUser(_auth): CurrentUser,
    Path(id): Path<i64>,
) -> Result<ApiResponse> {
    let repo = ProductRepository::new(state.pool());
    let product = repo
        .get(ProductId::new(id))
        .await?
        .ok_or_else(product_not_found)?;
    let types = repo.list_types(product.id).await?;

    Ok(ApiResponse::ok(
        "Product retrieved successfully",
        json!({ "product": product, "types": types }),
        None,
    ))
}

/// Look up a product and check it belongs to the member's store.
async fn owned_product(
    state: &AppState,
    auth_user: gerai_core::UserId,
    store_email: &str,
    product_id: ProductId,
) -> Result<Product> {
    let (store, _membership) =
        resolve_store_membership(state.pool(), store_email, auth_user).await?;

    ProductRepository::new(state.pool())
        .get(product_id)
        .await?
        .filter(|p| p.store_id == store.id)
        .ok_or_else(product_not_found)
}

#[derive(Deserialize)]
struct CreateTypeRequest {
    store_email: Option<String>,
    product_id: Option<i64>,
    name: Option<String>,
    price: Option<String>,
    quantity: Option<String>,
    description: Option<String>,
}

async fn create_type(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    ApiJson(form): ApiJson<CreateTypeRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/product/create/type");
    let store_email = v.email("store_email", form.store_email.as_deref());
    let name = v.required("name", form.name.as_deref());
    let price = v.decimal("price", form.price.as_deref());
    let quantity = v.integer("quantity", form.quantity.as_deref());
    if form.product_id.is_none() {
        v.required("product_id", None);
    }
    v.finish()?;
    let (store_email, name, price, quantity) = (
        store_email.expect("validated"),
        name.expect("validated"),
        price.expect("validated"),
        quantity.expect("validated"),
    );
    let product_id = ProductId::new(form.product_id.expect("validated"));

    let product = owned_product(&state, auth.user_id, store_email.as_str(), product_id).await?;

    let product_type = ProductRepository::new(state.pool())
        .create_type(&NewProductType {
            name,
            description: form.description.as_deref(),
            price,
            quantity,
            product_id: product.id,
        })
        .await?;

    Ok(ApiResponse::created(
        "Product type created successfully",
        json!({ "type": product_type }),
        Some("/product"),
    ))
}

#[derive(Deserialize)]
struct UpdateTypeRequest {
    store_email: Option<String>,
    name: Option<String>,
    price: Option<String>,
    quantity: Option<String>,
    description: Option<String>,
}

async fn update_type(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(id): Path<i64>,
    ApiJson(form): ApiJson<UpdateTypeRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/product/update/type");
    let store_email = v.email("store_email", form.store_email.as_deref());
    let price = v.sometimes("price", form.price.as_deref(), Validator::decimal);
    let quantity = v.sometimes("quantity", form.quantity.as_deref(), Validator::integer);
    v.finish()?;
    let store_email = store_email.expect("validated");

    let repo = ProductRepository::new(state.pool());
    let existing = repo
        .get_type(ProductTypeId::new(id))
        .await?
        .ok_or_else(product_not_found)?;

    // Membership is checked against the parent product's store
    owned_product(&state, auth.user_id, store_email.as_str(), existing.product_id).await?;

    let product_type = repo
        .update_type(
            existing.id,
            form.name.as_deref(),
            form.description.as_deref(),
            price,
            quantity,
        )
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => product_not_found(),
            other => ApiError::Database(other),
        })?;

    Ok(ApiResponse::ok(
        "Product type updated successfully",
        json!({ "type": product_type }),
        Some("/product"),
    ))
}

async fn delete_type(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(id): Path<i64>,
    ApiJson(form): ApiJson<StoreEmailRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/product");
    let store_email = v.email("store_email", form.store_email.as_deref());
    v.finish()?;
    let store_email = store_email.expect("validated");

    let repo = ProductRepository::new(state.pool());
    let existing = repo
        .get_type(ProductTypeId::new(id))
        .await?
        .ok_or_else(product_not_found)?;

    owned_product(&state, auth.user_id, store_email.as_str(), existing.product_id).await?;

    repo.delete_type(existing.id).await.map_err(|e| match e {
        crate::db::RepositoryError::NotFound => product_not_found(),
        other => ApiError::Database(other),
    })?;

    Ok(ApiResponse::ok(
        "Product type deleted successfully",
        json!({}),
        Some("/product"),
    ))
}
