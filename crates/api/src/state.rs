//! Application state shared across handlers.

use std::sync::Arc;

use secrecy::SecretString;
use storehouse_core::Entity;

use crate::config::StorehouseConfig;
use crate::db::{CollectionGateway, DocumentStore};
use crate::services::{AggregationComposer, ReferentialLinker};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The store handle is opened
/// once at startup and shared read-only by every request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorehouseConfig,
    store: Arc<dyn DocumentStore>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorehouseConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get a reference to the service configuration.
    #[must_use]
    pub fn config(&self) -> &StorehouseConfig {
        &self.inner.config
    }

    /// Get a reference to the shared document store.
    #[must_use]
    pub fn store(&self) -> &dyn DocumentStore {
        self.inner.store.as_ref()
    }

    /// Bearer tokens accepted by the API; empty when auth is disabled.
    #[must_use]
    pub fn api_tokens(&self) -> &[SecretString] {
        &self.inner.config.api_tokens
    }

    /// Gateway for `E`'s collection.
    #[must_use]
    pub fn gateway<E: Entity>(&self) -> CollectionGateway<'_, E> {
        CollectionGateway::new(self.store())
    }

    /// Linker applying the configured reference policy.
    #[must_use]
    pub fn linker(&self) -> ReferentialLinker<'_> {
        ReferentialLinker::new(self.store(), self.inner.config.reference_policy)
    }

    /// Composer for the customer views.
    #[must_use]
    pub fn composer(&self) -> AggregationComposer<'_> {
        AggregationComposer::new(self.store())
    }
}
