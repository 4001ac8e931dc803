//! Integration tests for store membership authorization.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied (`DATABASE_URL`)
//! - The API server running (cargo run -p gerai-api)
//!
//! Run with: cargo test -p gerai-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use gerai_integration_tests::{api_base_url, onboard_and_login, test_pool, unique_email};

const PASSWORD: &str = "correct-horse-battery";

/// POST a JSON body with a bearer token and return (status, envelope).
async fn post_authed(client: &Client, url: &str, token: &str, body: &Value) -> (StatusCode, Value) {
    let resp = client
        .post(url)
        .header("Authorization", format!("Bearer {token}"))
        .json(body)
        .send()
        .await
        .unwrap_or_else(|e| panic!("POST {url} failed: {e}"));
    let status = resp.status();
    let body: Value = resp.json().await.expect("response body was not JSON");
    (status, body)
}

/// Register a store for the bearer and return its email.
async fn register_store(client: &Client, token: &str, label: &str) -> String {
    let base = api_base_url();
    let store_email = unique_email(label);
    let (status, body) = post_authed(
        client,
        &format!("{base}/store/registered"),
        token,
        &json!({
            "name": format!("{label} Store"),
            "email": store_email,
            "password": "store-password-1",
            "confirm_password": "store-password-1",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "store registration failed: {body}");
    store_email
}

// ============================================================================
// Membership Gate
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_non_member_cannot_touch_the_catalog() {
    let client = Client::new();
    let pool = test_pool().await;
    let base = api_base_url();

    // Owner creates a store; outsider is fully onboarded but has no
    // membership row for it
    let owner_token =
        onboard_and_login(&client, &pool, &unique_email("owner"), PASSWORD).await;
    let outsider_token =
        onboard_and_login(&client, &pool, &unique_email("outsider"), PASSWORD).await;
    let store_email = register_store(&client, &owner_token, "gate").await;

    let product = json!({
        "store_email": store_email,
        "name": "Gated Product",
        "price": "125000.00",
        "quantity": "3",
    });

    // The outsider is authenticated yet still rejected
    let (status, body) = post_authed(
        &client,
        &format!("{base}/product/create"),
        &outsider_token,
        &product,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);

    // The owner's pivot row is what authorizes the same request
    let (status, _) = post_authed(
        &client,
        &format!("{base}/product/create"),
        &owner_token,
        &product,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

// ============================================================================
// One Store Per User
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_second_store_registration_conflicts() {
    let client = Client::new();
    let pool = test_pool().await;
    let base = api_base_url();
    let email = unique_email("seller");

    let token = onboard_and_login(&client, &pool, &email, PASSWORD).await;
    register_store(&client, &token, "first").await;

    let (status, body) = post_authed(
        &client,
        &format!("{base}/store/registered"),
        &token,
        &json!({
            "name": "Second Store",
            "email": unique_email("second"),
            "password": "store-password-2",
            "confirm_password": "store-password-2",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], 409);

    // Exactly one store row exists for the user regardless of how the
    // second attempt was rejected
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM stores s JOIN users u ON u.id = s.user_id WHERE u.email = $1",
    )
    .bind(&email)
    .fetch_one(&pool)
    .await
    .expect("count query failed");
    assert_eq!(count, 1);
}
