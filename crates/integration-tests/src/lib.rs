//! Integration tests for the Gerai API.
//!
//! The tests in `tests/` drive a running `gerai-api` server over HTTP and
//! inspect the database directly where the API deliberately withholds
//! values (verification codes are never echoed in responses).
//!
//! # Running Tests
//!
//! ```bash
//! # Apply migrations and start the server
//! cargo run -p gerai-cli -- migrate
//! cargo run -p gerai-api &
//!
//! # Run the ignored integration suite
//! DATABASE_URL=postgres://... cargo test -p gerai-integration-tests -- --ignored
//! ```

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Base URL for the API server (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Database pool for inspecting rows the API never returns.
///
/// # Panics
///
/// Panics when `DATABASE_URL` is unset or the database is unreachable.
pub async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for integration tests");
    PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to the test database")
}

/// A unique email per invocation so reruns never collide on the
/// `users.email` unique constraint.
///
/// # Panics
///
/// Panics when the system clock reports a time before the Unix epoch.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", unix_nanos())
}

/// A unique, well-formed phone number per invocation.
///
/// # Panics
///
/// Panics when the system clock reports a time before the Unix epoch.
#[must_use]
pub fn unique_phone() -> String {
    // Last nine digits of the timestamp keep the number inside the
    // accepted 10-15 digit range.
    format!("+628{:09}", unix_nanos() % 1_000_000_000)
}

fn unix_nanos() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before Unix epoch")
        .as_nanos()
}

/// Walk a fresh user through the whole onboarding flow and log them in.
///
/// Covers register, email code, phone code, password, and profile, then
/// returns the bearer token issued by login. Verification codes are read
/// straight from the `users` row.
///
/// # Panics
///
/// Panics when any step responds with an unexpected status or shape.
pub async fn onboard_and_login(
    client: &Client,
    pool: &PgPool,
    email: &str,
    password: &str,
) -> String {
    let base = api_base_url();

    let body = post_json(
        client,
        &format!("{base}/auth/register"),
        &json!({ "email": email }),
        StatusCode::CREATED,
    )
    .await;
    let session = body["data"]["session_token"]
        .as_str()
        .expect("register response missing session_token")
        .to_owned();

    post_json(
        client,
        &format!("{base}/auth/send-email-code"),
        &json!({ "email": email }),
        StatusCode::CREATED,
    )
    .await;
    let code = stored_code(pool, email, "email_verification_code").await;
    post_json(
        client,
        &format!("{base}/auth/verify-email"),
        &json!({ "email": email, "code": code, "session": session }),
        StatusCode::CREATED,
    )
    .await;

    let phone = unique_phone();
    post_json(
        client,
        &format!("{base}/auth/send-phone-number-code"),
        &json!({ "email": email, "phone_number": phone }),
        StatusCode::CREATED,
    )
    .await;
    let code = stored_code(pool, email, "phone_number_verification_code").await;
    post_json(
        client,
        &format!("{base}/auth/verify-phone-number"),
        &json!({ "phone_number": phone, "code": code, "session": session }),
        StatusCode::CREATED,
    )
    .await;

    post_json(
        client,
        &format!("{base}/auth/add-password"),
        &json!({
            "password": password,
            "confirm_password": password,
            "session": session,
        }),
        StatusCode::CREATED,
    )
    .await;

    let username = format!("user-{}", unix_nanos());
    post_json(
        client,
        &format!("{base}/auth/add-information"),
        &json!({
            "firstname": "Integration",
            "lastname": "Test",
            "username": username,
            "session": session,
        }),
        StatusCode::CREATED,
    )
    .await;

    let body = post_json(
        client,
        &format!("{base}/auth/login"),
        &json!({ "email": email, "password": password }),
        StatusCode::CREATED,
    )
    .await;
    body["data"]["token"]
        .as_str()
        .expect("login response missing token")
        .to_owned()
}

/// POST a JSON body, assert the status, and return the parsed envelope.
///
/// # Panics
///
/// Panics on transport errors, a status mismatch, or a non-JSON body.
pub async fn post_json(
    client: &Client,
    url: &str,
    body: &Value,
    expected: StatusCode,
) -> Value {
    let resp = client
        .post(url)
        .json(body)
        .send()
        .await
        .unwrap_or_else(|e| panic!("POST {url} failed: {e}"));
    let status = resp.status();
    let body: Value = resp.json().await.expect("response body was not JSON");
    assert_eq!(status, expected, "POST {url} returned {status}: {body}");
    body
}

async fn stored_code(pool: &PgPool, email: &str, column: &str) -> String {
    let query = format!("SELECT {column} FROM users WHERE email = $1");
    let (code,): (Option<String>,) = sqlx::query_as(&query)
        .bind(email)
        .fetch_one(pool)
        .await
        .expect("user row missing");
    code.expect("verification code was never stored")
}
