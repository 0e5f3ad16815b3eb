//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                   - Liveness
//! GET    /health/ready             - Readiness (store ping)
//!
//! # Per collection: customers, addresses, orders, products
//! POST   /{collection}             - Create, 201 {"_id": "..."}
//! GET    /{collection}             - List, query string is an equality filter
//! GET    /{collection}/{id}        - Fetch one
//! PATCH  /{collection}/{id}        - Merge-patch, {"status": "updated"}
//! PUT    /{collection}/{id}        - Same as PATCH
//! DELETE /{collection}/{id}        - Delete, {"status": "deleted"}
//!
//! # Composite views
//! GET    /customers/{id}/bundle    - Customer, addresses and orders
//! GET    /customers/{id}/full      - Same as bundle
//! GET    /customers/{id}/details   - Bundle with products attached to order items
//! ```

pub mod addresses;
pub mod customers;
pub mod extract;
pub mod health;
pub mod orders;
pub mod products;
pub mod resource;

use std::time::Duration;

use axum::{
    Router,
    http::{Request, Response},
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use storehouse_core::models::{Address, Customer, Order, Product};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{request_id_middleware, require_bearer};
use crate::state::AppState;

pub use resource::{Confirmation, Created, Resource};

/// CRUD routes for one collection.
fn collection_routes<R: Resource>() -> Router<AppState> {
    let base = format!("/{}", R::COLLECTION);
    let item = format!("{base}/{{id}}");
    Router::new()
        .route(&base, get(resource::list::<R>).post(resource::create::<R>))
        .route(
            &item,
            get(resource::get::<R>)
                .patch(resource::update::<R>)
                .put(resource::update::<R>)
                .delete(resource::delete::<R>),
        )
}

/// Every entity route, behind the bearer gate.
pub fn entity_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(collection_routes::<Customer>())
        .merge(collection_routes::<Address>())
        .merge(collection_routes::<Order>())
        .merge(collection_routes::<Product>())
        .route("/customers/{id}/bundle", get(customers::bundle))
        .route("/customers/{id}/full", get(customers::bundle))
        .route("/customers/{id}/details", get(customers::details))
        .route_layer(from_fn_with_state(state.clone(), require_bearer))
}

/// Build the complete application with its middleware stack.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(entity_routes(&state))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
