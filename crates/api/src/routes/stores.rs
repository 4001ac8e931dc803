//! Store endpoints.
//!
//! Mutations are double-gated: the caller's bearer token, then the
//! membership pivot row for the store named by `store_email`.

use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;

use gerai_core::{StoreId, StoreStatus};

use crate::db::products::ProductRepository;
use crate::db::stores::{NewStore, StoreRepository, UpdateStore};
use crate::error::{ApiError, Result};
use crate::middleware::CurrentUser;
use crate::response::ApiResponse;
use crate::routes::slugify;
use crate::services::auth::{generate_token, hash_password, verify_password};
use crate::services::authz::resolve_store_membership;
use crate::state::AppState;
use crate::validate::{ApiJson, Validator};

/// Create the store routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/registered", post(register_store))
        .route("/login", post(store_login))
        .route("/logout", post(store_logout))
        .route("/update", post(update_store))
        .route("/update-status", post(update_status))
        .route("/show", get(show_all))
        .route("/show/{id}", get(show_one))
}

#[derive(Deserialize)]
struct RegisterStoreRequest {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    confirm_password: Option<String>,
    description: Option<String>,
    address: Option<String>,
    store_type: Option<String>,
    category: Option<String>,
    image: Option<String>,
}

async fn register_store(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    ApiJson(form): ApiJson<RegisterStoreRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/store/registered");
    let name = v.required("name", form.name.as_deref());
    let email = v.email("email", form.email.as_deref());
    let password = v.required("password", form.password.as_deref());
    v.same(
        "confirm_password",
        form.confirm_password.as_deref(),
        "password",
        form.password.as_deref(),
    );
    v.finish()?;
    let (name, email, password) = (
        name.expect("validated"),
        email.expect("validated"),
        password.expect("validated"),
    );

    let repo = StoreRepository::new(state.pool());
    if repo.exists_for_user(auth.user_id).await? {
        return Err(ApiError::Conflict {
            message: "You already have a store".to_owned(),
            redirect: "/store",
        });
    }

    // New image lands on disk before the row that references it
    let image_url = match form.image.as_deref() {
        Some(data) => Some(state.files().store("stores", data).await?),
        None => None,
    };

    let password_hash = hash_password(password)?;
    let store = repo
        .create_with_owner(
            &NewStore {
                name,
                slug: &slugify(name),
                email: email.as_str(),
                description: form.description.as_deref(),
                address: form.address.as_deref(),
                store_type: form.store_type.as_deref(),
                category: form.category.as_deref(),
                password_hash: &password_hash,
            },
            auth.user_id,
        )
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::Conflict(message) => ApiError::Conflict {
                message,
                redirect: "/store",
            },
            other => ApiError::Database(other),
        })?;

    let store = match image_url {
        Some(url) => {
            repo.update(
                store.id,
                &UpdateStore {
                    image: Some(&url),
                    ..UpdateStore::default()
                },
            )
            .await?
        }
        None => store,
    };

    Ok(ApiResponse::created(
        "Store registered successfully",
        json!({ "store": store }),
        Some("/store"),
    ))
}

#[derive(Deserialize)]
struct StoreLoginRequest {
    store_email: Option<String>,
    password: Option<String>,
}

async fn store_login(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    ApiJson(form): ApiJson<StoreLoginRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/store/login");
    let store_email = v.email("store_email", form.store_email.as_deref());
    let password = v.required("password", form.password.as_deref());
    v.finish()?;
    let (store_email, password) = (
        store_email.expect("validated"),
        password.expect("validated"),
    );

    let (store, _membership) =
        resolve_store_membership(state.pool(), store_email.as_str(), auth.user_id).await?;

    verify_password(password, &store.password_hash)?;

    let token = generate_token();
    StoreRepository::new(state.pool())
        .set_member_token(auth.user_id, store.id, &token)
        .await?;

    Ok(ApiResponse::created(
        "Login to store successful",
        json!({ "token": token, "store_id": store.id }),
        Some("/store"),
    ))
}

#[derive(Deserialize)]
struct StoreEmailRequest {
    store_email: Option<String>,
}

async fn store_logout(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    ApiJson(form): ApiJson<StoreEmailRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/store/login");
    let store_email = v.email("store_email", form.store_email.as_deref());
    v.finish()?;
    let store_email = store_email.expect("validated");

    let (store, _membership) =
        resolve_store_membership(state.pool(), store_email.as_str(), auth.user_id).await?;

    StoreRepository::new(state.pool())
        .clear_member_token(auth.user_id, store.id)
        .await?;

    Ok(ApiResponse::created(
        "Logout from store successful",
        json!({}),
        Some("/store"),
    ))
}

#[derive(Deserialize)]
struct UpdateStoreRequest {
    store_email: Option<String>,
    name: Option<String>,
    description: Option<String>,
    address: Option<String>,
    store_type: Option<String>,
    category: Option<String>,
    image: Option<String>,
}

async fn update_store(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    ApiJson(form): ApiJson<UpdateStoreRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/store/update");
    let store_email = v.email("store_email", form.store_email.as_deref());
    v.finish()?;
    let store_email = store_email.expect("validated");

    let (store, _membership) =
        resolve_store_membership(state.pool(), store_email.as_str(), auth.user_id).await?;

    // New image lands on disk before the row update; the old file goes away
    // only after the row commits
    let new_image = match form.image.as_deref() {
        Some(data) => Some(state.files().store("stores", data).await?),
        None => None,
    };
    let old_image = store.image.clone();

    let slug = form.name.as_deref().map(slugify);
    let updated = StoreRepository::new(state.pool())
        .update(
            store.id,
            &UpdateStore {
                name: form.name.as_deref(),
                slug: slug.as_deref(),
                description: form.description.as_deref(),
                address: form.address.as_deref(),
                store_type: form.store_type.as_deref(),
                category: form.category.as_deref(),
                image: new_image.as_deref(),
            },
        )
        .await?;

    if new_image.is_some() {
        if let Some(old) = old_image {
            state.files().delete(&old).await?;
        }
    }

    Ok(ApiResponse::ok(
        "Store updated successfully",
        json!({ "store": updated }),
        Some("/store"),
    ))
}

#[derive(Deserialize)]
struct UpdateStatusRequest {
    store_email: Option<String>,
    status: Option<String>,
}

async fn update_status(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    ApiJson(form): ApiJson<UpdateStatusRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/store/update-status");
    let store_email = v.email("store_email", form.store_email.as_deref());
    let status = match v.required("status", form.status.as_deref()) {
        Some(raw) => StoreStatus::from_str(raw).ok(),
        None => None,
    };
    v.finish()?;
    let store_email = store_email.expect("validated");
    let Some(status) = status else {
        return Err(ApiError::Validation {
            errors: std::collections::BTreeMap::from([(
                "status".to_owned(),
                "The status field must be one of: active, inactive, suspended.".to_owned(),
            )]),
            redirect: "/store/update-status",
        });
    };

    let (store, _membership) =
        resolve_store_membership(state.pool(), store_email.as_str(), auth.user_id).await?;

    let updated = StoreRepository::new(state.pool())
        .update_status(store.id, status)
        .await?;

    Ok(ApiResponse::ok(
        "Store status updated successfully",
        json!({ "store": updated }),
        Some("/store"),
    ))
}

async fn show_all(State(state): State<AppState>, CurrentUser(_auth): CurrentUser) -> Result<ApiResponse> {
    let stores = StoreRepository::new(state.pool()).list_all().await?;
    Ok(ApiResponse::ok(
        "Stores retrieved successfully",
        json!({ "stores": stores }),
        None,
    ))
}

async fn show_one(
    State(state): State<AppState>,
    CurrentUser(_auth): CurrentUser,
    Path(id): Path<i64>,
) -> Result<ApiResponse> {
    let store = StoreRepository::new(state.pool())
        .get_by_id(StoreId::new(id))
        .await?
        .ok_or(ApiError::NotFound {
            message: "Store not found".to_owned(),
            redirect: "/store",
        })?;
    let products = ProductRepository::new(state.pool())
        .list_by_store(store.id)
        .await?;

    Ok(ApiResponse::ok(
        "Store retrieved successfully",
        json!({ "store": store, "products": products }),
        None,
    ))
}
