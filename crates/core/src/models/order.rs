//! Order documents and their embedded line items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, Patch, Product};
use crate::types::{CustomerId, OrderId, OrderStatus, Price, ProductId};
use crate::validation::{
    Validate, ValidationError, any, require_non_negative_price, require_positive, require_text,
    required_patch,
};

/// A stored order. `customer_id` is a soft reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Entity for Order {
    const COLLECTION: &'static str = "orders";
    const NAME: &'static str = "order";
}

/// A line item embedded in an order.
///
/// `product` is only present in the expanded customer view, and only when
/// the referenced product still exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Box<Product>>,
}

/// Payload for creating an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewOrder {
    pub customer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<NewOrderItem>,
}

/// A line item in a create or replace payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewOrderItem {
    pub product_id: String,
    pub quantity: i64,
    pub price: Price,
}

impl Validate for NewOrder {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("customerId", &self.customer_id)?;
        validate_items(&self.items)
    }
}

/// Merge-patch for an order. Sending `items` replaces the whole sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderPatch {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub customer_id: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub order_date: Patch<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub status: Patch<OrderStatus>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub items: Patch<Vec<NewOrderItem>>,
}

impl Validate for OrderPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if self == &Self::default() {
            return Err(ValidationError::EmptyPatch);
        }
        required_patch("customerId", &self.customer_id, |f, v| require_text(f, v))?;
        required_patch("orderDate", &self.order_date, any)?;
        required_patch("status", &self.status, any)?;
        required_patch("items", &self.items, |_, items| validate_items(items))
    }
}

fn validate_items(items: &[NewOrderItem]) -> Result<(), ValidationError> {
    for (index, item) in items.iter().enumerate() {
        require_text(&format!("items[{index}].productId"), &item.product_id)?;
        require_positive(&format!("items[{index}].quantity"), item.quantity)?;
        require_non_negative_price(&format!("items[{index}].price"), item.price)?;
    }
    Ok(())
}
