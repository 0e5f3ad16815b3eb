//! Product documents.

use serde::{Deserialize, Deserializer, Serialize};

use super::{Entity, Patch};
use crate::types::{Price, ProductId, ProductStatus};
use crate::validation::{
    Validate, ValidationError, any, optional_patch, require_non_negative,
    require_non_negative_price, require_text, required_patch,
};

/// A stored product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Entity for Product {
    const COLLECTION: &'static str = "products";
    const NAME: &'static str = "product";
}

/// Payload for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewProduct {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub stock: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default, deserialize_with = "unique_tags")]
    pub tags: Vec<String>,
}

impl Validate for NewProduct {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_non_negative_price("price", self.price)?;
        require_non_negative("stock", self.stock)
    }
}

/// Merge-patch for a product. `description` and `category` may be cleared;
/// tags are replaced as a whole (send `[]` to empty them).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub description: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub price: Patch<Price>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub stock: Patch<i64>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub category: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub status: Patch<ProductStatus>,
    #[serde(
        default,
        skip_serializing_if = "Patch::is_absent",
        deserialize_with = "unique_tags_patch"
    )]
    pub tags: Patch<Vec<String>>,
}

impl Validate for ProductPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if self == &Self::default() {
            return Err(ValidationError::EmptyPatch);
        }
        required_patch("name", &self.name, |f, v| require_text(f, v))?;
        optional_patch("description", &self.description, any)?;
        required_patch("price", &self.price, |f, v| require_non_negative_price(f, *v))?;
        required_patch("stock", &self.stock, |f, v| require_non_negative(f, *v))?;
        optional_patch("category", &self.category, any)?;
        required_patch("status", &self.status, any)?;
        required_patch("tags", &self.tags, any)
    }
}

/// Keep the first occurrence of each tag, in order.
fn dedupe(tags: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}

fn unique_tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Vec::<String>::deserialize(deserializer).map(dedupe)
}

fn unique_tags_patch<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Patch<Vec<String>>, D::Error> {
    Option::<Vec<String>>::deserialize(deserializer).map(|tags| Patch::from(tags.map(dedupe)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_product_dedupes_tags() {
        let product: NewProduct = serde_json::from_value(json!({
            "name": "Pineapple",
            "price": 9.99,
            "tags": ["fruit", "tropical", "fruit"]
        }))
        .unwrap();
        assert_eq!(product.tags, vec!["fruit", "tropical"]);
        assert_eq!(product.stock, 0);
        assert_eq!(product.status, ProductStatus::Active);
        assert!(product.validate().is_ok());
    }

    #[test]
    fn test_new_product_bounds() {
        let negative: NewProduct = serde_json::from_value(json!({
            "name": "Pineapple",
            "price": -1.0
        }))
        .unwrap();
        assert!(matches!(
            negative.validate(),
            Err(ValidationError::OutOfRange { .. })
        ));

        let no_stock: NewProduct = serde_json::from_value(json!({
            "name": "Pineapple",
            "price": 1,
            "stock": -3
        }))
        .unwrap();
        assert!(no_stock.validate().is_err());
    }

    #[test]
    fn test_price_is_stored_as_double() {
        let product: NewProduct =
            serde_json::from_value(json!({"name": "Pineapple", "price": 9.99})).unwrap();
        let doc = bson::to_document(&product).unwrap();
        assert!((doc.get_f64("price").unwrap() - 9.99).abs() < 1e-9);
    }

    #[test]
    fn test_patch_rejects_null_price() {
        let patch: ProductPatch = serde_json::from_value(json!({"price": null})).unwrap();
        assert!(matches!(
            patch.validate(),
            Err(ValidationError::NullNotAllowed { .. })
        ));

        let tags: ProductPatch =
            serde_json::from_value(json!({"tags": ["a", "a", "b"]})).unwrap();
        assert_eq!(tags.tags, Patch::Set(vec!["a".to_string(), "b".to_string()]));
    }
}
