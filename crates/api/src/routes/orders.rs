//! Order routes.

use bson::Document;
use chrono::Utc;
use serde::Deserialize;
use storehouse_core::models::{NewOrder, Order, OrderPatch};
use storehouse_core::{OrderStatus, decode};

use super::resource::{Resource, put_filter};
use crate::error::AppError;
use crate::services::References;

/// Query parameters accepted by `GET /orders`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderFilter {
    pub customer_id: Option<String>,
    pub status: Option<OrderStatus>,
}

impl Resource for Order {
    type New = NewOrder;
    type Patch = OrderPatch;
    type Filter = OrderFilter;

    const REFERENCES: References = References::Order;

    fn filter_document(filter: OrderFilter) -> Result<Document, AppError> {
        let mut doc = Document::new();
        put_filter(
            &mut doc,
            "customerId",
            filter.customer_id.as_deref().map(decode).transpose()?,
        );
        put_filter(&mut doc, "status", filter.status.map(|s| s.as_str()));
        Ok(doc)
    }

    fn prepare(payload: &mut NewOrder) {
        payload.order_date.get_or_insert_with(Utc::now);
    }
}
