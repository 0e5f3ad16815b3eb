//! Storehouse API - HTTP service for the e-commerce document collections.
//!
//! # Architecture
//!
//! - Axum web framework, JSON in and out
//! - MongoDB (or an in-memory store) holding four independent collections
//! - Composite customer views assembled from several lookups per request
//!
//! Indexes are NOT created on startup. Create them explicitly via:
//! `cargo run -p storehouse-cli -- indexes`

#![cfg_attr(not(test), forbid(unsafe_code))]

use storehouse_api::config::StorehouseConfig;
use storehouse_api::telemetry::{init_sentry, init_tracing};
use storehouse_api::{AppState, db, router};

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = StorehouseConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config.sentry);
    init_tracing(config.log_json);

    let store = db::connect(&config.store)
        .await
        .expect("Failed to open document store");

    if config.api_tokens.is_empty() {
        tracing::warn!("STOREHOUSE_API_TOKENS is not set; API authentication is disabled");
    } else {
        tracing::info!(tokens = config.api_tokens.len(), "Bearer authentication enabled");
    }
    tracing::info!(policy = ?config.reference_policy, "Reference policy");

    let addr = config.socket_addr();
    let state = AppState::new(config, store);
    let app = router(state);

    tracing::info!("storehouse-api listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
