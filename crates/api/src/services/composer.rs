//! Composite customer views assembled from several collections.
//!
//! The store has no join, so a view is a sequence of single-collection
//! lookups. The sequence is not atomic: a write landing between two lookups
//! may or may not be reflected in the result.

use std::collections::HashMap;

use bson::oid::ObjectId;
use bson::doc;
use serde::Serialize;
use storehouse_core::models::{Address, Customer, Order, Product};
use storehouse_core::into_entity;

use crate::db::{CollectionGateway, DocumentStore, RepositoryError};

/// A customer together with everything that references it.
///
/// Addresses and orders keep the order the store returned them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerBundle {
    pub customer: Customer,
    pub addresses: Vec<Address>,
    pub orders: Vec<Order>,
}

/// Builds the composite views.
pub struct AggregationComposer<'a> {
    customers: CollectionGateway<'a, Customer>,
    addresses: CollectionGateway<'a, Address>,
    orders: CollectionGateway<'a, Order>,
    products: CollectionGateway<'a, Product>,
}

impl<'a> AggregationComposer<'a> {
    /// Create a composer over `store`.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self {
            customers: CollectionGateway::new(store),
            addresses: CollectionGateway::new(store),
            orders: CollectionGateway::new(store),
            products: CollectionGateway::new(store),
        }
    }

    /// The customer, its addresses and its orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer does not exist;
    /// no partial view is produced.
    pub async fn customer_bundle(&self, id: ObjectId) -> Result<CustomerBundle, RepositoryError> {
        let customer = self.customers.fetch(id).await?;
        let addresses = self.addresses.fetch_all(doc! { "customerId": id }).await?;
        let orders = self.orders.fetch_all(doc! { "customerId": id }).await?;

        tracing::debug!(
            customer_id = %id,
            addresses = addresses.len(),
            orders = orders.len(),
            "Composed customer bundle"
        );
        Ok(CustomerBundle {
            customer,
            addresses,
            orders,
        })
    }

    /// Like [`customer_bundle`](Self::customer_bundle), with each order item
    /// carrying the product it references under `product`.
    ///
    /// Each distinct product is fetched once. Items whose product no longer
    /// exists, or can no longer be read as a product, are returned as stored
    /// without a `product` field.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer does not exist.
    pub async fn customer_details(&self, id: ObjectId) -> Result<CustomerBundle, RepositoryError> {
        let customer = self.customers.fetch(id).await?;
        let addresses = self.addresses.fetch_all(doc! { "customerId": id }).await?;
        let mut orders = self.orders.fetch_all(doc! { "customerId": id }).await?;

        let product_ids = referenced_products(&orders);
        let mut products = HashMap::with_capacity(product_ids.len());
        for product_id in product_ids {
            let Some(doc) = self.products.find_by_id(product_id).await? else {
                continue;
            };
            match into_entity::<Product>(doc) {
                Ok(product) => {
                    products.insert(product_id, product);
                }
                Err(err) => {
                    tracing::warn!(product_id = %product_id, error = %err, "Skipping unreadable product");
                }
            }
        }

        for order in &mut orders {
            attach_products(order, &products);
        }

        tracing::debug!(
            customer_id = %id,
            addresses = addresses.len(),
            orders = orders.len(),
            products = products.len(),
            "Composed customer details"
        );
        Ok(CustomerBundle {
            customer,
            addresses,
            orders,
        })
    }
}

/// Distinct product ids referenced by `orders`, in first-seen order.
fn referenced_products(orders: &[Order]) -> Vec<ObjectId> {
    let mut ids = Vec::new();
    for item in orders.iter().flat_map(|order| &order.items) {
        if let Some(id) = item.product_id.map(|id| id.as_object_id())
            && !ids.contains(&id)
        {
            ids.push(id);
        }
    }
    ids
}

fn attach_products(order: &mut Order, products: &HashMap<ObjectId, Product>) {
    for item in &mut order.items {
        if let Some(product) = item
            .product_id
            .and_then(|id| products.get(&id.as_object_id()))
        {
            item.product = Some(Box::new(product.clone()));
        }
    }
}
