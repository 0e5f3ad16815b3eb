//! Print a composite customer view.

use storehouse_api::services::AggregationComposer;
use storehouse_core::decode;

/// Print the bundle (or details) view of a customer as pretty JSON.
///
/// # Errors
///
/// Returns an error if the id is malformed, the customer does not exist or
/// the store cannot be reached.
pub async fn customer(raw_id: &str, details: bool) -> Result<(), Box<dyn std::error::Error>> {
    let id = decode(raw_id)?;
    let store = super::open_store().await?;
    let composer = AggregationComposer::new(store.as_ref());

    let view = if details {
        composer.customer_details(id).await?
    } else {
        composer.customer_bundle(id).await?
    };

    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
