//! Linking of cross-collection references on writes.

use axum::http::StatusCode;
use serde_json::json;
use storehouse_api::config::StorehouseConfig;
use storehouse_api::services::ReferencePolicy;
use storehouse_integration_tests::{TestApp, fixtures};

const DANGLING: &str = "65a1f0c2b3d4e5f601234567";

#[tokio::test]
async fn test_malformed_customer_reference_stores_nothing() {
    let app = TestApp::new();

    let response = app.post("/addresses", fixtures::address("abc", "London")).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["error"],
        "Invalid reference: customerId: identifier must be 24 characters (got 3)"
    );

    let response = app.post("/orders", fixtures::order("not-a-valid-identifier!!", &[])).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    assert!(app.store.is_empty("addresses"));
    assert!(app.store.is_empty("orders"));
}

#[tokio::test]
async fn test_malformed_item_names_its_index() {
    let app = TestApp::new();
    let customer = app.create("customers", fixtures::customer("Ada")).await;
    let product = app.create("products", fixtures::product("Pineapple", 1.0)).await;

    let payload = fixtures::order(&customer, &[(product.as_str(), 1, 1.0), ("bad-id", 1, 1.0)]);
    let response = app.post("/orders", payload).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["error"],
        "Invalid reference: items[1].productId: identifier must be 24 characters (got 6)"
    );
    assert!(app.store.is_empty("orders"));
}

#[tokio::test]
async fn test_order_without_items_is_valid() {
    let app = TestApp::new();
    let customer = app.create("customers", fixtures::customer("Ada")).await;

    let id = app.create("orders", fixtures::order(&customer, &[])).await;
    let body = app.get(&format!("/orders/{id}")).await.body;
    assert_eq!(body["items"], json!([]));
}

#[tokio::test]
async fn test_dangling_references_are_accepted_by_default() {
    let app = TestApp::new();

    let address = app.create("addresses", fixtures::address(DANGLING, "London")).await;
    let order = app
        .create("orders", fixtures::order(DANGLING, &[(DANGLING, 1, 2.0)]))
        .await;

    let body = app.get(&format!("/addresses/{address}")).await.body;
    assert_eq!(body["customerId"], DANGLING);
    let body = app.get(&format!("/orders/{order}")).await.body;
    assert_eq!(body["items"][0]["productId"], DANGLING);
}

#[tokio::test]
async fn test_verified_references_must_exist() {
    let mut config = StorehouseConfig::in_memory();
    config.reference_policy = ReferencePolicy::MustExist;
    let app = TestApp::with_config(config);

    let response = app.post("/addresses", fixtures::address(DANGLING, "London")).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["error"],
        format!("Invalid reference: customerId references a missing customer {DANGLING}").as_str()
    );
    assert!(app.store.is_empty("addresses"));

    let customer = app.create("customers", fixtures::customer("Ada")).await;
    app.create("addresses", fixtures::address(&customer, "London")).await;

    let response = app
        .post("/orders", fixtures::order(&customer, &[(DANGLING, 1, 2.0)]))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.store.is_empty("orders"));
}

#[tokio::test]
async fn test_patched_references_are_relinked() {
    let app = TestApp::new();
    let ada = app.create("customers", fixtures::customer("Ada")).await;
    let grace = app.create("customers", fixtures::customer("Grace")).await;
    let address = app.create("addresses", fixtures::address(&ada, "London")).await;

    let response = app
        .patch(&format!("/addresses/{address}"), json!({ "customerId": grace }))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let graces = app.get(&format!("/addresses?customerId={grace}")).await.body;
    assert_eq!(graces.as_array().unwrap().len(), 1);
    let adas = app.get(&format!("/addresses?customerId={ada}")).await.body;
    assert!(adas.as_array().unwrap().is_empty());

    let response = app
        .patch(&format!("/addresses/{address}"), json!({ "customerId": "xyz" }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patched_items_replace_the_sequence() {
    let app = TestApp::new();
    let customer = app.create("customers", fixtures::customer("Ada")).await;
    let apple = app.create("products", fixtures::product("Apple", 1.0)).await;
    let pear = app.create("products", fixtures::product("Pear", 2.0)).await;
    let order = app
        .create("orders", fixtures::order(&customer, &[(apple.as_str(), 1, 1.0), (apple.as_str(), 2, 1.0)]))
        .await;

    let response = app
        .patch(
            &format!("/orders/{order}"),
            json!({ "items": [{ "productId": pear, "quantity": 5, "price": 2.0 }] }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let body = app.get(&format!("/orders/{order}")).await.body;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["productId"], pear.as_str());
    assert_eq!(items[0]["quantity"], 5);
}

#[tokio::test]
async fn test_list_by_malformed_customer_is_bad_request() {
    let app = TestApp::new();
    let response = app.get("/orders?customerId=123").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.operation_count(), 0);
}
