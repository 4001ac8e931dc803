//! Favorite endpoints. All records are scoped to the bearer's user id.

use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use serde::Deserialize;
use serde_json::json;

use gerai_core::{FavoriteId, ProductId};

use crate::db::{FavoriteRepository, ProductRepository, RepositoryError};
use crate::error::{ApiError, Result};
use crate::middleware::CurrentUser;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::validate::{ApiJson, Validator};

/// Create the favorite routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(add_favorite))
        .route("/delete/{id}", post(remove_favorite))
        .route("/show", get(show_favorites))
}

#[derive(Deserialize)]
struct AddFavoriteRequest {
    product_id: Option<i64>,
}

async fn add_favorite(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    ApiJson(form): ApiJson<AddFavoriteRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/favorite/create");
    if form.product_id.is_none() {
        v.required("product_id", None);
    }
    v.finish()?;
    let product_id = ProductId::new(form.product_id.expect("validated"));

    let product = ProductRepository::new(state.pool())
        .get(product_id)
        .await?
        .ok_or(ApiError::NotFound {
            message: "Product not found".to_owned(),
            redirect: "/product",
        })?;

    let favorite = FavoriteRepository::new(state.pool())
        .add(auth.user_id, product.id)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(message) => ApiError::Conflict {
                message,
                redirect: "/favorite",
            },
            other => ApiError::Database(other),
        })?;

    Ok(ApiResponse::created(
        "Product added to favorites",
        json!({ "favorite": favorite }),
        Some("/favorite"),
    ))
}

async fn remove_favorite(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(id): Path<i64>,
) -> Result<ApiResponse> {
    FavoriteRepository::new(state.pool())
        .delete(FavoriteId::new(id), auth.user_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => ApiError::NotFound {
                message: "Favorite not found".to_owned(),
                redirect: "/favorite",
            },
            other => ApiError::Database(other),
        })?;

    Ok(ApiResponse::ok(
        "Product removed from favorites",
        json!({}),
        Some("/favorite"),
    ))
}

async fn show_favorites(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
) -> Result<ApiResponse> {
    let favorites = FavoriteRepository::new(state.pool())
        .list_by_user(auth.user_id)
        .await?;

    Ok(ApiResponse::ok(
        "Favorites retrieved successfully",
        json!({ "favorites": favorites }),
        None,
    ))
}
