//! Document store access.
//!
//! # Database: `storehouse` (MongoDB)
//!
//! ## Collections
//!
//! - `customers` - Customer accounts
//! - `addresses` - Billing/shipping addresses, `customerId` references `customers`
//! - `orders` - Orders with embedded line items, `customerId` references
//!   `customers`, `items[].productId` references `products`
//! - `products` - Product catalog
//!
//! References are stored as native `ObjectId`s but are soft: nothing in the
//! store enforces that the referenced document exists, and deletes never
//! cascade.
//!
//! # Indexes
//!
//! The composite customer views filter `addresses` and `orders` by
//! `customerId`. Create those indexes explicitly via:
//! ```bash
//! cargo run -p storehouse-cli -- indexes
//! ```

pub mod gateway;
pub mod memory;
pub mod mongo;
pub mod store;

use std::sync::Arc;

use storehouse_core::NormalizeError;
use thiserror::Error;

use crate::config::StoreConfig;

pub use gateway::CollectionGateway;
pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use store::DocumentStore;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The store could not be reached or rejected the operation.
    #[error("store error: {0}")]
    Store(#[from] mongodb::error::Error),

    /// The targeted document does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// A payload could not be converted into a document.
    #[error("serialization error: {0}")]
    Serialization(#[from] bson::ser::Error),

    /// A stored document does not have the expected shape.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

impl From<NormalizeError> for RepositoryError {
    fn from(err: NormalizeError) -> Self {
        Self::DataCorruption(err.to_string())
    }
}

/// Open the configured document store.
///
/// The returned handle is created once at startup and shared by every
/// request; it is never reconnected per request.
///
/// # Errors
///
/// Returns `RepositoryError::Store` if the MongoDB connection string is
/// invalid or the client cannot be built.
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>, RepositoryError> {
    match config {
        StoreConfig::Mongo { uri, database } => {
            let store = MongoStore::connect(uri, database).await?;
            tracing::info!(database = %database, "Connected to MongoDB");
            Ok(Arc::new(store))
        }
        StoreConfig::Memory => {
            tracing::warn!("Using in-memory document store; data is lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
