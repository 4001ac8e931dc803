//! Address book endpoints. All records are scoped to the bearer's user id.

use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use serde::Deserialize;
use serde_json::json;

use gerai_core::AddressId;

use crate::db::addresses::{AddressRepository, NewAddress, UpdateAddress};
use crate::error::{ApiError, Result};
use crate::middleware::CurrentUser;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::validate::{ApiJson, Validator};

/// Create the address routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_address))
        .route("/update/{id}", post(update_address))
        .route("/delete/{id}", post(delete_address))
        .route("/show", get(show_all))
        .route("/show/{id}", get(show_one))
}

fn address_not_found() -> ApiError {
    ApiError::NotFound {
        message: "Address not found".to_owned(),
        redirect: "/address",
    }
}

#[derive(Deserialize)]
struct AddressRequest {
    name: Option<String>,
    phone_number: Option<String>,
    full_address: Option<String>,
    district: Option<String>,
    city: Option<String>,
    province: Option<String>,
    country: Option<String>,
    coordinate: Option<String>,
}

async fn create_address(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    ApiJson(form): ApiJson<AddressRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/address/create");
    let name = v.required("name", form.name.as_deref());
    let phone = v.phone("phone_number", form.phone_number.as_deref());
    let full_address = v.required("full_address", form.full_address.as_deref());
    v.finish()?;
    let (name, phone, full_address) = (
        name.expect("validated"),
        phone.expect("validated"),
        full_address.expect("validated"),
    );

    let address = AddressRepository::new(state.pool())
        .create(
            auth.user_id,
            &NewAddress {
                name,
                phone_number: phone.as_str(),
                full_address,
                district: form.district.as_deref(),
                city: form.city.as_deref(),
                province: form.province.as_deref(),
                country: form.country.as_deref(),
                coordinate: form.coordinate.as_deref(),
            },
        )
        .await?;

    Ok(ApiResponse::created(
        "Address created successfully",
        json!({ "address": address }),
        Some("/address"),
    ))
}

async fn update_address(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(id): Path<i64>,
    ApiJson(form): ApiJson<AddressRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/address/update");
    let phone = v.sometimes("phone_number", form.phone_number.as_deref(), Validator::phone);
    v.finish()?;

    let address = AddressRepository::new(state.pool())
        .update(
            AddressId::new(id),
            auth.user_id,
            &UpdateAddress {
                name: form.name.as_deref(),
                phone_number: phone.as_ref().map(gerai_core::PhoneNumber::as_str),
                full_address: form.full_address.as_deref(),
                district: form.district.as_deref(),
                city: form.city.as_deref(),
                province: form.province.as_deref(),
                country: form.country.as_deref(),
                coordinate: form.coordinate.as_deref(),
            },
        )
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => address_not_found(),
            other => ApiError::Database(other),
        })?;

    Ok(ApiResponse::ok(
        "Address updated successfully",
        json!({ "address": address }),
        Some("/address"),
    ))
}

async fn delete_address(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(id): Path<i64>,
) -> Result<ApiResponse> {
    AddressRepository::new(state.pool())
        .delete(AddressId::new(id), auth.user_id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => address_not_found(),
            other => ApiError::Database(other),
        })?;

    Ok(ApiResponse::ok(
        "Address deleted successfully",
        json!({}),
        Some("/address"),
    ))
}

async fn show_all(State(state): State<AppState>, CurrentUser(auth): CurrentUser) -> Result<ApiResponse> {
    let addresses = AddressRepository::new(state.pool())
        .list_by_user(auth.user_id)
        .await?;

    Ok(ApiResponse::ok(
        "Addresses retrieved successfully",
        json!({ "addresses": addresses }),
        None,
    ))
}

async fn show_one(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(id): Path<i64>,
) -> Result<ApiResponse> {
    let address = AddressRepository::new(state.pool())
        .get(AddressId::new(id), auth.user_id)
        .await?
        .ok_or_else(address_not_found)?;

    Ok(ApiResponse::ok(
        "Address retrieved successfully",
        json!({ "address": address }),
        None,
    ))
}
