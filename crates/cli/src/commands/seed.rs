//! Seed the store with a small demo dataset.
//!
//! Writes go through the same validation, defaults and reference linking as
//! the API, so the seeded documents look exactly like ones created over HTTP.

use bson::oid::ObjectId;
use storehouse_api::db::CollectionGateway;
use storehouse_api::routes::Resource;
use storehouse_api::services::{ReferencePolicy, ReferentialLinker};
use storehouse_core::models::{
    Address, Customer, NewAddress, NewCustomer, NewOrder, NewOrderItem, NewProduct, Order, Product,
};
use storehouse_core::{AddressType, CustomerStatus, OrderStatus, Price, ProductStatus, Validate};
use tracing::info;

/// Insert one customer with an address, a product and an order.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or any write fails.
pub async fn demo() -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store().await?;
    let linker = ReferentialLinker::new(store.as_ref(), ReferencePolicy::MustExist);

    let customer_id = create::<Customer>(
        &linker,
        NewCustomer {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@storehouse.test".to_string(),
            phone: None,
            status: CustomerStatus::Active,
        },
    )
    .await?;

    let address_id = create::<Address>(
        &linker,
        NewAddress {
            customer_id: customer_id.to_hex(),
            street: "12 St James's Square".to_string(),
            city: "London".to_string(),
            state: None,
            zip: Some("SW1Y 4JH".to_string()),
            country: "GB".to_string(),
            address_type: AddressType::Shipping,
        },
    )
    .await?;

    let product_id = create::<Product>(
        &linker,
        NewProduct {
            name: "Difference Engine".to_string(),
            description: Some("Brass, hand-cranked".to_string()),
            price: Price::from_cents(999),
            stock: 3,
            category: Some("machines".to_string()),
            status: ProductStatus::Active,
            tags: vec!["brass".to_string(), "analytical".to_string()],
        },
    )
    .await?;

    let order_id = create::<Order>(
        &linker,
        NewOrder {
            customer_id: customer_id.to_hex(),
            order_date: None,
            status: OrderStatus::Pending,
            items: vec![NewOrderItem {
                product_id: product_id.to_hex(),
                quantity: 2,
                price: Price::from_cents(999),
            }],
        },
    )
    .await?;

    info!(
        customer = %customer_id,
        address = %address_id,
        product = %product_id,
        order = %order_id,
        "Seeded demo data"
    );
    println!("customer {customer_id}");
    println!("address  {address_id}");
    println!("product  {product_id}");
    println!("order    {order_id}");
    Ok(())
}

/// Validate, link and insert one create payload.
async fn create<R: Resource>(
    linker: &ReferentialLinker<'_>,
    mut payload: R::New,
) -> Result<ObjectId, Box<dyn std::error::Error>> {
    payload.validate()?;
    R::prepare(&mut payload);
    let mut doc = bson::to_document(&payload)?;
    linker.link(R::REFERENCES, &mut doc).await?;
    Ok(CollectionGateway::<R>::new(linker.store()).create(doc).await?)
}
