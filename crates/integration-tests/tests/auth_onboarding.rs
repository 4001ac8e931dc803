//! Integration tests for the credential lifecycle.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied (`DATABASE_URL`)
//! - The API server running (cargo run -p gerai-api)
//!
//! Run with: cargo test -p gerai-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use gerai_integration_tests::{
    api_base_url, onboard_and_login, post_json, test_pool, unique_email,
};

const PASSWORD: &str = "correct-horse-battery";

/// GET an endpoint with a bearer token and return (status, envelope).
async fn get_authed(client: &Client, url: &str, token: &str) -> (StatusCode, Value) {
    let resp = client
        .get(url)
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await
        .unwrap_or_else(|e| panic!("GET {url} failed: {e}"));
    let status = resp.status();
    let body: Value = resp.json().await.expect("response body was not JSON");
    (status, body)
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_duplicate_registration_conflicts_and_keeps_one_row() {
    let client = Client::new();
    let pool = test_pool().await;
    let base = api_base_url();
    let email = unique_email("duplicate");

    post_json(
        &client,
        &format!("{base}/auth/register"),
        &json!({ "email": email }),
        StatusCode::CREATED,
    )
    .await;

    // Second registration with the same email must conflict
    let body = post_json(
        &client,
        &format!("{base}/auth/register"),
        &json!({ "email": email }),
        StatusCode::CONFLICT,
    )
    .await;
    assert_eq!(body["status"], 409);

    // And must not have inserted a second row
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&pool)
        .await
        .expect("count query failed");
    assert_eq!(count, 1);
}

// ============================================================================
// Bearer Token Lifecycle
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_login_token_resolves_to_the_same_user() {
    let client = Client::new();
    let pool = test_pool().await;
    let base = api_base_url();
    let email = unique_email("bearer");

    let token = onboard_and_login(&client, &pool, &email, PASSWORD).await;

    // Create a record under the token, then read it back under the same
    // token; both resolving means the token maps to one stable user
    let resp = client
        .post(format!("{base}/address/create"))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({
            "name": "Home",
            "phone_number": "+628111234567",
            "full_address": "Jl. Integration 1",
        }))
        .send()
        .await
        .expect("address create failed");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let (status, body) = get_authed(&client, &format!("{base}/address/show"), &token).await;
    assert_eq!(status, StatusCode::OK);
    let addresses = body["data"]["addresses"]
        .as_array()
        .expect("addresses should be an array");
    assert!(
        addresses
            .iter()
            .any(|a| a["full_address"] == "Jl. Integration 1")
    );
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_logout_invalidates_the_old_token() {
    let client = Client::new();
    let pool = test_pool().await;
    let base = api_base_url();
    let email = unique_email("logout");

    let token = onboard_and_login(&client, &pool, &email, PASSWORD).await;

    let (status, _) = get_authed(&client, &format!("{base}/address/show"), &token).await;
    assert_eq!(status, StatusCode::OK);

    let resp = client
        .post(format!("{base}/auth/logout"))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await
        .expect("logout failed");
    assert_eq!(resp.status(), StatusCode::CREATED);

    // The revoked token must no longer resolve anywhere
    let (status, body) = get_authed(&client, &format!("{base}/address/show"), &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
}

// ============================================================================
// End-to-End Onboarding
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_full_onboarding_issues_a_working_token() {
    let client = Client::new();
    let pool = test_pool().await;
    let base = api_base_url();
    let email = unique_email("onboarding");

    // Register through profile, then login
    let token = onboard_and_login(&client, &pool, &email, PASSWORD).await;
    assert!(!token.is_empty());

    // The row went through every verification step
    let (email_verified, phone_verified): (bool, bool) = sqlx::query_as(
        "SELECT email_verify, phone_number_verify FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_one(&pool)
    .await
    .expect("user row missing");
    assert!(email_verified);
    assert!(phone_verified);

    // Logout, then the token stops resolving
    let resp = client
        .post(format!("{base}/auth/logout"))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await
        .expect("logout failed");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let (status, _) = get_authed(&client, &format!("{base}/address/show"), &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
