//! Order endpoints.
//!
//! Creation prices every line from the product table at request time,
//! sums the order total, and writes the header plus all lines in a single
//! transaction.

use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use gerai_core::{AddressId, OrderId, ProductId};

use crate::db::orders::{NewCheckout, NewOrder};
use crate::db::{AddressRepository, OrderRepository, ProductRepository};
use crate::error::{ApiError, Result};
use crate::middleware::CurrentUser;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::validate::{ApiJson, Validator};

/// Create the order routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_order))
        .route("/show", get(show_all))
        .route("/show/{id}", get(show_one))
}

fn order_not_found() -> ApiError {
    ApiError::NotFound {
        message: "Order not found".to_owned(),
        redirect: "/order",
    }
}

#[derive(Deserialize)]
struct OrderItemRequest {
    product_id: Option<i64>,
    quantity: Option<i32>,
}

#[derive(Deserialize)]
struct CreateOrderRequest {
    address_id: Option<i64>,
    items: Option<Vec<OrderItemRequest>>,
}

async fn create_order(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    ApiJson(form): ApiJson<CreateOrderRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/order/create");
    if form.address_id.is_none() {
        v.required("address_id", None);
    }
    let items = form.items.unwrap_or_default();
    if items.is_empty() {
        v.required("items", None);
    }
    for (index, item) in items.iter().enumerate() {
        if item.product_id.is_none() {
            v.required(&format!("items.{index}.product_id"), None);
        }
        if item.quantity.is_none_or(|q| q <= 0) {
            v.required(&format!("items.{index}.quantity"), None);
        }
    }
    v.finish()?;
    let address_id = AddressId::new(form.address_id.expect("validated"));

    // The shipping address must belong to the caller
    AddressRepository::new(state.pool())
        .get(address_id, auth.user_id)
        .await?
        .ok_or(ApiError::NotFound {
            message: "Address not found".to_owned(),
            redirect: "/address",
        })?;

    let products = ProductRepository::new(state.pool());
    let mut lines = Vec::with_capacity(items.len());
    let mut order_total = Decimal::ZERO;
    for item in &items {
        let product_id = ProductId::new(item.product_id.expect("validated"));
        let quantity = item.quantity.expect("validated");

        let product = products.get(product_id).await?.ok_or(ApiError::NotFound {
            message: "Product not found".to_owned(),
            redirect: "/product",
        })?;

        let line_total = product.price * Decimal::from(quantity);
        order_total += line_total;
        lines.push(NewCheckout {
            product_id: product.id,
            quantity,
            price: product.price,
            total: line_total,
            after_disc: None,
            fee_shipping: None,
            distance_shipping: None,
        });
    }

    let (order, checkouts) = OrderRepository::new(state.pool())
        .create_with_checkouts(
            auth.user_id,
            &NewOrder {
                total: order_total,
                total_disc: None,
                address_id,
                payment_id: None,
                disc_id: None,
            },
            &lines,
        )
        .await?;

    Ok(ApiResponse::created(
        "Order created successfully",
        json!({ "order": order, "checkouts": checkouts }),
        Some("/order"),
    ))
}

async fn show_all(State(state): State<AppState>, CurrentUser(auth): CurrentUser) -> Result<ApiResponse> {
    let orders = OrderRepository::new(state.pool())
        .list_by_user(auth.user_id)
        .await?;

    Ok(ApiResponse::ok(
        "Orders retrieved successfully",
        json!({ "orders": orders }),
        None,
    ))
}

async fn show_one(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(id): Path<i64>,
) -> Result<ApiResponse> {
    let (order, checkouts) = OrderRepository::new(state.pool())
        .get(OrderId::new(id), auth.user_id)
        .await?
        .ok_or_else(order_not_found)?;

    Ok(ApiResponse::ok(
        "Order retrieved successfully",
        json!({ "order": order, "checkouts": checkouts }),
        None,
    ))
}
