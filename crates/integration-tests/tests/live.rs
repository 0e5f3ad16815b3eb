//! Live tests against a running storehouse-api.
//!
//! These tests require:
//! - A running MongoDB
//! - The API server running (cargo run -p storehouse-api)
//!
//! Run with: cargo test -p storehouse-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use storehouse_integration_tests::fixtures;

/// Base URL for the API (configurable via environment).
fn base_url() -> String {
    std::env::var("STOREHOUSE_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Client sending `STOREHOUSE_TEST_TOKEN` as a bearer token when set.
fn client() -> Client {
    let mut headers = reqwest::header::HeaderMap::new();
    if let Ok(token) = std::env::var("STOREHOUSE_TEST_TOKEN") {
        headers.insert(
            reqwest::header::AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );
    }
    Client::builder()
        .default_headers(headers)
        .build()
        .expect("Failed to create HTTP client")
}

async fn create(client: &Client, collection: &str, body: Value) -> String {
    let resp = client
        .post(format!("{}/{collection}", base_url()))
        .json(&body)
        .send()
        .await
        .expect("Failed to create document");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse response");
    body["_id"].as_str().unwrap().to_string()
}

#[tokio::test]
#[ignore = "Requires running storehouse-api and MongoDB"]
async fn test_live_readiness() {
    let resp = client()
        .get(format!("{}/health/ready", base_url()))
        .send()
        .await
        .expect("Failed to reach server");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storehouse-api and MongoDB"]
async fn test_live_customer_details() {
    let client = client();
    let customer = create(&client, "customers", fixtures::customer("Live")).await;
    create(&client, "addresses", fixtures::address(&customer, "London")).await;
    let product = create(&client, "products", fixtures::product("Pineapple", 9.99)).await;
    create(
        &client,
        "orders",
        fixtures::order(&customer, &[(product.as_str(), 2, 9.99)]),
    )
    .await;

    let resp = client
        .get(format!("{}/customers/{customer}/details", base_url()))
        .send()
        .await
        .expect("Failed to fetch details");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse details");
    assert_eq!(body["customer"]["_id"], customer.as_str());
    assert_eq!(body["addresses"].as_array().unwrap().len(), 1);
    assert_eq!(
        body["orders"][0]["items"][0]["product"]["_id"],
        product.as_str()
    );

    // Clean up (no cascade, so each document goes separately)
    for (collection, id) in [("customers", &customer), ("products", &product)] {
        let _ = client
            .delete(format!("{}/{collection}/{id}", base_url()))
            .send()
            .await;
    }
}

#[tokio::test]
#[ignore = "Requires running storehouse-api and MongoDB"]
async fn test_live_malformed_id() {
    let resp = client()
        .patch(format!("{}/orders/not-an-id", base_url()))
        .json(&json!({ "status": "shipped" }))
        .send()
        .await
        .expect("Failed to reach server");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
