//! Integration tests for Storehouse.
//!
//! # Running Tests
//!
//! ```bash
//! # Router-level tests over an in-memory store
//! cargo test -p storehouse-integration-tests
//!
//! # Live tests against a running server
//! STOREHOUSE_BASE_URL=http://localhost:3000 \
//!     cargo test -p storehouse-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `crud` - Create, fetch, list, patch and delete per collection
//! - `references` - Linking of `customerId` and `items[].productId`
//! - `composites` - Customer bundle and details views
//! - `auth` - Bearer gate and request ids
//! - `live` - The same flows over HTTP against a real deployment

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use storehouse_api::config::StorehouseConfig;
use storehouse_api::db::MemoryStore;
use storehouse_api::{AppState, router};
use tower::ServiceExt;

/// Largest response body the helpers will read.
const BODY_LIMIT: usize = 1024 * 1024;

/// The full application over a fresh in-memory store.
pub struct TestApp {
    /// Handle onto the store the router writes to.
    pub store: MemoryStore,
    router: Router,
    token: Option<String>,
}

/// A response with its body decoded as JSON (or a JSON string for text).
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestApp {
    /// App with default configuration: no auth, soft references.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StorehouseConfig::in_memory())
    }

    /// App with a custom configuration. The store setting is ignored.
    #[must_use]
    pub fn with_config(config: StorehouseConfig) -> Self {
        let store = MemoryStore::new();
        let state = AppState::new(config, Arc::new(store.clone()));
        Self {
            store,
            router: router(state),
            token: None,
        }
    }

    /// Send `token` as a bearer token on every following request.
    #[must_use]
    pub fn authenticated(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Send a request through the router.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        self.request_with(method, uri, body, &[]).await
    }

    /// Send a request with extra headers.
    pub async fn request_with(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = &self.token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Send a raw (possibly malformed) JSON body.
    pub async fn request_raw(&self, method: Method, uri: &str, raw: &'static str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(raw))
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
        TestResponse {
            status,
            headers,
            body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
        }
    }

    /// `GET uri`
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    /// `POST uri` with a JSON body.
    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    /// `PATCH uri` with a JSON body.
    pub async fn patch(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    /// `DELETE uri`
    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }

    /// Create a document and return its id, asserting 201.
    pub async fn create(&self, collection: &str, body: Value) -> String {
        let response = self.post(&format!("/{collection}"), body).await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "create {collection} failed: {}",
            response.body
        );
        response.body["_id"].as_str().unwrap().to_string()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Payload builders for the four collections.
pub mod fixtures {
    use serde_json::{Value, json};

    #[must_use]
    pub fn customer(first_name: &str) -> Value {
        json!({
            "firstName": first_name,
            "lastName": "Tester",
            "email": format!("{}@storehouse.test", first_name.to_lowercase()),
            "phone": "+44 20 7946 0000",
        })
    }

    #[must_use]
    pub fn address(customer_id: &str, city: &str) -> Value {
        json!({
            "customerId": customer_id,
            "street": "1 Main St",
            "city": city,
            "zip": "12345",
            "country": "GB",
            "type": "shipping",
        })
    }

    #[must_use]
    pub fn product(name: &str, price: f64) -> Value {
        json!({
            "name": name,
            "price": price,
            "stock": 10,
            "category": "fruit",
            "tags": ["fresh", "tropical"],
        })
    }

    #[must_use]
    pub fn order(customer_id: &str, items: &[(&str, i64, f64)]) -> Value {
        let items: Vec<Value> = items
            .iter()
            .map(|(product_id, quantity, price)| {
                json!({ "productId": product_id, "quantity": quantity, "price": price })
            })
            .collect();
        json!({ "customerId": customer_id, "items": items })
    }
}
