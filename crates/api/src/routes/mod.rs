//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Auth (onboarding and sessions)
//! POST /auth/register                - Create user, issue session token
//! POST /auth/send-email-code         - Mail a 6-digit email code
//! POST /auth/verify-email            - Check code, mark email verified
//! POST /auth/send-phone-number-code  - Record phone, mail its code
//! POST /auth/verify-phone-number     - Check code, mark phone verified
//! POST /auth/add-password            - Store password hash
//! POST /auth/add-information         - Fill in profile fields
//! POST /auth/login                   - Issue bearer token
//! POST /auth/logout                  - Revoke bearer token (bearer)
//! POST /auth/forgot-password         - Mail a 30-minute reset token
//! POST /auth/reset-password          - Consume reset token, set password
//!
//! # Stores (bearer; mutations additionally need membership)
//! POST /store/registered             - Create store + owner membership
//! POST /store/login                  - Issue store-scoped token
//! POST /store/logout                 - Clear store-scoped token
//! POST /store/update                 - Update store fields
//! POST /store/update-status          - Set store status
//! GET  /store/show                   - List all stores
//! GET  /store/show/{id}              - Show one store
//!
//! # Products (bearer; mutations need store membership)
//! POST /product/create               - Create product
//! POST /product/update/{id}          - Update product
//! POST /product/delete/{id}          - Delete product
//! GET  /product/show/{id}            - Product with its variants
//! POST /product/create/type          - Create variant
//! POST /product/update/type/{id}     - Update variant
//! POST /product/delete/type/{id}     - Delete variant
//!
//! # Owned records (bearer)
//! POST /address/create, /address/update/{id}, /address/delete/{id}
//! GET  /address/show, /address/show/{id}
//! POST /cart/create, /cart/update/{id}, /cart/delete/{id}
//! GET  /cart/show
//! POST /favorite/create, /favorite/delete/{id}
//! GET  /favorite/show
//! POST /order/create
//! GET  /order/show, /order/show/{id}
//! ```

pub mod addresses;
pub mod auth;
pub mod carts;
pub mod favorites;
pub mod orders;
pub mod products;
pub mod stores;

use axum::Router;

use crate::state::AppState;

/// Build the full API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::routes())
        .nest("/store", stores::routes())
        .nest("/product", products::routes())
        .nest("/address", addresses::routes())
        .nest("/cart", carts::routes())
        .nest("/favorite", favorites::routes())
        .nest("/order", orders::routes())
}

/// Derive a URL slug from a display name.
pub(crate) fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Toko Maju Jaya"), "toko-maju-jaya");
        assert_eq!(slugify("  Kopi & Teh!  "), "kopi-teh");
        assert_eq!(slugify("already-slugged"), "already-slugged");
        assert_eq!(slugify(""), "");
    }
}
