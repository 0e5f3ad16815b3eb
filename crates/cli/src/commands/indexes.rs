//! Create the indexes the composite customer views filter on.

use storehouse_core::Entity;
use storehouse_core::models::{Address, Order, Product};
use tracing::info;

/// `(collection, field)` pairs to index.
const INDEXES: &[(&str, &str)] = &[
    (Address::COLLECTION, "customerId"),
    (Order::COLLECTION, "customerId"),
    (Product::COLLECTION, "tags"),
];

/// Create every index, skipping ones that already exist.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or an index cannot be
/// created.
pub async fn create() -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store().await?;

    for (collection, field) in INDEXES {
        store.ensure_index(collection, field).await?;
        info!(collection, field, "Index ready");
    }

    info!(count = INDEXES.len(), "Indexes created");
    Ok(())
}
