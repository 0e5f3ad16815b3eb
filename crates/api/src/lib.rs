//! Storehouse API library.
//!
//! The HTTP service over the customer, address, order and product
//! collections, exposed as a library so the router can be driven by tests
//! and the CLI can reuse the store and services.
//!
//! # Layers
//!
//! - [`db`] - Document store trait, MongoDB and in-memory stores, gateways
//! - [`services`] - Reference linking and composite customer views
//! - [`routes`] - Axum handlers and the router
//! - [`middleware`] - Request ids and bearer authentication

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;

pub use routes::router;
pub use state::AppState;
