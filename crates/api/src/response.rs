//! Uniform JSON response envelope.
//!
//! Every endpoint, success or failure, answers with the same shape:
//!
//! ```json
//! { "status": 200, "message": "...", "data": {}, "redirect": "/next" }
//! ```
//!
//! The HTTP status code always mirrors the `status` field.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

/// The response envelope returned by every handler.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    /// HTTP-style status code, mirrored into the response status line.
    pub status: u16,
    /// Human-readable outcome description.
    pub message: String,
    /// Endpoint-specific payload; `{}` when there is nothing to say.
    pub data: serde_json::Value,
    /// Suggested next client route, if any.
    pub redirect: Option<String>,
}

impl ApiResponse {
    /// Build an envelope with an explicit status code.
    #[must_use]
    pub fn new(
        status: StatusCode,
        message: impl Into<String>,
        data: serde_json::Value,
        redirect: Option<&str>,
    ) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            data,
            redirect: redirect.map(String::from),
        }
    }

    /// 200 OK envelope.
    #[must_use]
    pub fn ok(message: impl Into<String>, data: serde_json::Value, redirect: Option<&str>) -> Self {
        Self::new(StatusCode::OK, message, data, redirect)
    }

    /// 201 Created envelope.
    #[must_use]
    pub fn created(
        message: impl Into<String>,
        data: serde_json::Value,
        redirect: Option<&str>,
    ) -> Self {
        Self::new(StatusCode::CREATED, message, data, redirect)
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let resp = ApiResponse::created(
            "User registered successfully",
            serde_json::json!({ "user": { "id": 1 } }),
            Some("/verify-email"),
        );
        let value = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(value["status"], 201);
        assert_eq!(value["message"], "User registered successfully");
        assert_eq!(value["data"]["user"]["id"], 1);
        assert_eq!(value["redirect"], "/verify-email");
    }

    #[test]
    fn test_null_redirect() {
        let resp = ApiResponse::ok("ok", serde_json::json!({}), None);
        let value = serde_json::to_value(&resp).expect("serialize");
        assert!(value["redirect"].is_null());
    }

    #[test]
    fn test_http_status_mirrors_field() {
        let resp = ApiResponse::created("created", serde_json::json!({}), None);
        let http = resp.into_response();
        assert_eq!(http.status(), StatusCode::CREATED);
    }
}
