//! Cart endpoints. All records are scoped to the bearer's user id.

use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use serde::Deserialize;
use serde_json::json;

use gerai_core::{CartItemId, ProductId};

use crate::db::{CartRepository, ProductRepository};
use crate::error::{ApiError, Result};
use crate::middleware::CurrentUser;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::validate::{ApiJson, Validator};

/// Create the cart routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(add_to_cart))
        .route("/update/{id}", post(update_quantity))
        .route("/delete/{id}", post(remove_from_cart))
        .route("/show", get(show_cart))
}

fn cart_item_not_found() -> ApiError {
    ApiError::NotFound {
        message: "Cart item not found".to_owned(),
        redirect: "/cart",
    }
}

#[derive(Deserialize)]
struct AddToCartRequest {
    product_id: Option<i64>,
    quantity: Option<String>,
}

async fn add_to_cart(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    ApiJson(form): ApiJson<AddToCartRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/cart/create");
    let quantity = v.integer("quantity", form.quantity.as_deref());
    if form.product_id.is_none() {
        v.required("product_id", None);
    }
    v.finish()?;
    let quantity = quantity.expect("validated");
    let product_id = ProductId::new(form.product_id.expect("validated"));

    let product = ProductRepository::new(state.pool())
        .get(product_id)
        .await?
        .ok_or(ApiError::NotFound {
            message: "Product not found".to_owned(),
            redirect: "/product",
        })?;

    let item = CartRepository::new(state.pool())
        .add(auth.user_id, product.id, quantity)
        .await?;

    Ok(ApiResponse::created(
        "Product added to cart",
        json!({ "cart_item": item }),
        Some("/cart"),
    ))
}

#[derive(Deserialize)]
struct UpdateQuantityRequest {
    action: Option<String>,
}

async fn update_quantity(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(id): Path<i64>,
    ApiJson(form): ApiJson<UpdateQuantityRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/cart");
    let action = v.required("action", form.action.as_deref());
    let delta = match action {
        Some("increment") => Some(1),
        Some("decrement") => Some(-1),
        Some(_) => {
            return Err(ApiError::Validation {
                errors: std::collections::BTreeMap::from([(
                    "action".to_owned(),
                    "The action field must be increment or decrement.".to_owned(),
                )]),
                redirect: "/cart",
            });
        }
        None => None,
    };
    v.finish()?;
    let delta = delta.expect("validated");

    let item = CartRepository::new(state.pool())
        .adjust_quantity(CartItemId::new(id), auth.user_id, delta)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => cart_item_not_found(),
            other => ApiError::Database(other),
        })?;

    Ok(ApiResponse::ok(
        "Cart updated successfully",
        json!({ "cart_item": item }),
        Some("/cart"),
    ))
}

async fn remove_from_cart(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(id): Path<i64>,
) -> Result<ApiResponse> {
    CartRepository::new(state.pool())
        .delete(CartItemId::new(id), auth.user_id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => cart_item_not_found(),
            other => ApiError::Database(other),
        })?;

    Ok(ApiResponse::ok(
        "Product removed from cart",
        json!({}),
        Some("/cart"),
    ))
}

async fn show_cart(State(state): State<AppState>, CurrentUser(auth): CurrentUser) -> Result<ApiResponse> {
    let items = CartRepository::new(state.pool())
        .list_by_user(auth.user_id)
        .await?;

    Ok(ApiResponse::ok(
        "Cart retrieved successfully",
        json!({ "cart_items": items }),
        None,
    ))
}
