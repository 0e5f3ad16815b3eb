//! Product routes.

use bson::Document;
use serde::Deserialize;
use storehouse_core::ProductStatus;
use storehouse_core::models::{NewProduct, Product, ProductPatch};

use super::resource::{Resource, put_filter};
use crate::error::AppError;

/// Query parameters accepted by `GET /products`.
///
/// `tag` matches products whose `tags` contain the value.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub status: Option<ProductStatus>,
    pub name: Option<String>,
    pub tag: Option<String>,
}

impl Resource for Product {
    type New = NewProduct;
    type Patch = ProductPatch;
    type Filter = ProductFilter;

    fn filter_document(filter: ProductFilter) -> Result<Document, AppError> {
        let mut doc = Document::new();
        put_filter(&mut doc, "category", filter.category);
        put_filter(&mut doc, "status", filter.status.map(|s| s.as_str()));
        put_filter(&mut doc, "name", filter.name);
        put_filter(&mut doc, "tags", filter.tag);
        Ok(doc)
    }
}
