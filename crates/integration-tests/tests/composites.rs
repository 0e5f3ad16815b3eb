//! Composite customer views.

use axum::http::StatusCode;
use serde_json::json;
use storehouse_integration_tests::{TestApp, fixtures};

#[tokio::test]
async fn test_end_to_end_customer_details() {
    let app = TestApp::new();
    let customer = app.create("customers", fixtures::customer("Ada")).await;
    let address = app.create("addresses", fixtures::address(&customer, "London")).await;
    let product = app.create("products", fixtures::product("Pineapple", 9.99)).await;
    let order = app
        .create("orders", fixtures::order(&customer, &[(product.as_str(), 2, 9.99)]))
        .await;

    let response = app.get(&format!("/customers/{customer}/details")).await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.body;

    assert_eq!(body["customer"], app.get(&format!("/customers/{customer}")).await.body);
    assert_eq!(
        body["addresses"],
        json!([app.get(&format!("/addresses/{address}")).await.body])
    );

    let orders = body["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["_id"], order.as_str());

    let item = &orders[0]["items"][0];
    assert_eq!(item["productId"], product.as_str());
    assert_eq!(item["quantity"], 2);
    assert_eq!(
        item["product"],
        app.get(&format!("/products/{product}")).await.body
    );
}

#[tokio::test]
async fn test_bundle_ignores_other_customers() {
    let app = TestApp::new();
    let ada = app.create("customers", fixtures::customer("Ada")).await;
    let grace = app.create("customers", fixtures::customer("Grace")).await;

    app.create("addresses", fixtures::address(&ada, "London")).await;
    app.create("addresses", fixtures::address(&ada, "Paris")).await;
    app.create("addresses", fixtures::address(&grace, "Arlington")).await;
    app.create("orders", fixtures::order(&ada, &[])).await;
    app.create("orders", fixtures::order(&grace, &[])).await;
    app.create("orders", fixtures::order(&grace, &[])).await;

    let body = app.get(&format!("/customers/{ada}/bundle")).await.body;
    assert_eq!(body["customer"]["_id"], ada.as_str());

    let addresses = body["addresses"].as_array().unwrap();
    assert_eq!(addresses.len(), 2);
    assert!(addresses.iter().all(|a| a["customerId"] == ada.as_str()));

    let orders = body["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["customerId"], ada.as_str());
}

#[tokio::test]
async fn test_full_is_an_alias_of_bundle() {
    let app = TestApp::new();
    let customer = app.create("customers", fixtures::customer("Ada")).await;
    app.create("addresses", fixtures::address(&customer, "London")).await;

    let bundle = app.get(&format!("/customers/{customer}/bundle")).await;
    let full = app.get(&format!("/customers/{customer}/full")).await;
    assert_eq!(full.status, StatusCode::OK);
    assert_eq!(full.body, bundle.body);
}

#[tokio::test]
async fn test_bundle_does_not_attach_products() {
    let app = TestApp::new();
    let customer = app.create("customers", fixtures::customer("Ada")).await;
    let product = app.create("products", fixtures::product("Pineapple", 1.0)).await;
    app.create("orders", fixtures::order(&customer, &[(product.as_str(), 1, 1.0)]))
        .await;

    let body = app.get(&format!("/customers/{customer}/bundle")).await.body;
    assert!(body["orders"][0]["items"][0].get("product").is_none());
}

#[tokio::test]
async fn test_details_omits_missing_products() {
    let app = TestApp::new();
    let customer = app.create("customers", fixtures::customer("Ada")).await;
    let kept = app.create("products", fixtures::product("Pineapple", 1.0)).await;
    let gone = app.create("products", fixtures::product("Durian", 4.5)).await;
    app.create(
        "orders",
        fixtures::order(&customer, &[(kept.as_str(), 1, 1.0), (gone.as_str(), 3, 4.5)]),
    )
    .await;
    app.delete(&format!("/products/{gone}")).await;

    let response = app.get(&format!("/customers/{customer}/details")).await;
    assert_eq!(response.status, StatusCode::OK);

    let items = response.body["orders"][0]["items"].as_array().unwrap().clone();
    assert_eq!(items[0]["product"]["name"], "Pineapple");

    let missing = items[1].as_object().unwrap();
    assert!(!missing.contains_key("product"));
    assert_eq!(missing["productId"], gone.as_str());
    assert_eq!(missing["quantity"], 3);
    assert!((missing["price"].as_f64().unwrap() - 4.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_missing_customer_fails_whole_view() {
    let app = TestApp::new();
    let id = "65a1f0c2b3d4e5f601234567";
    app.create("addresses", fixtures::address(id, "London")).await;

    for view in ["bundle", "details", "full"] {
        let response = app.get(&format!("/customers/{id}/{view}")).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{view}");
    }

    let response = app.get("/customers/nope/details").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deleting_customer_does_not_cascade() {
    let app = TestApp::new();
    let customer = app.create("customers", fixtures::customer("Ada")).await;
    app.create("addresses", fixtures::address(&customer, "London")).await;

    app.delete(&format!("/customers/{customer}")).await;

    let orphans = app.get(&format!("/addresses?customerId={customer}")).await.body;
    assert_eq!(orphans.as_array().unwrap().len(), 1);
    assert_eq!(
        app.get(&format!("/customers/{customer}/bundle")).await.status,
        StatusCode::NOT_FOUND
    );
}
