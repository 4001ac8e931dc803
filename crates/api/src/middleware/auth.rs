//! Bearer-token authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::services::authz::{AuthContext, resolve_bearer};
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// Resolves the `Authorization: Bearer <token>` header against the identity
/// store once per request and hands the handler an explicit [`AuthContext`].
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     CurrentUser(auth): CurrentUser,
/// ) -> Result<ApiResponse> {
///     tracing::debug!(user_id = %auth.user_id, "authenticated request");
///     // ...
/// }
/// ```
pub struct CurrentUser(pub AuthContext);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let context = resolve_bearer(state.pool(), token).await?;
        Ok(Self(context))
    }
}
