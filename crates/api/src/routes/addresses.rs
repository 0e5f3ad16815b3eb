//! Address routes.

use bson::Document;
use serde::Deserialize;
use storehouse_core::models::{Address, AddressPatch, NewAddress};
use storehouse_core::{AddressType, decode};

use super::resource::{Resource, put_filter};
use crate::error::AppError;
use crate::services::References;

/// Query parameters accepted by `GET /addresses`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddressFilter {
    pub customer_id: Option<String>,
    #[serde(rename = "type")]
    pub address_type: Option<AddressType>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
}

impl Resource for Address {
    type New = NewAddress;
    type Patch = AddressPatch;
    type Filter = AddressFilter;

    const REFERENCES: References = References::Customer;

    fn filter_document(filter: AddressFilter) -> Result<Document, AppError> {
        let mut doc = Document::new();
        put_filter(
            &mut doc,
            "customerId",
            filter.customer_id.as_deref().map(decode).transpose()?,
        );
        put_filter(&mut doc, "type", filter.address_type.map(|t| t.as_str()));
        put_filter(&mut doc, "city", filter.city);
        put_filter(&mut doc, "state", filter.state);
        put_filter(&mut doc, "zip", filter.zip);
        put_filter(&mut doc, "country", filter.country);
        Ok(doc)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bson::doc;
    use bson::oid::ObjectId;

    use super::*;

    #[test]
    fn test_customer_filter_is_decoded() {
        let customer = ObjectId::new();
        let filter = AddressFilter {
            customer_id: Some(customer.to_hex()),
            address_type: Some(AddressType::Shipping),
            ..AddressFilter::default()
        };
        assert_eq!(
            Address::filter_document(filter).unwrap(),
            doc! { "customerId": customer, "type": "shipping" }
        );
    }

    #[test]
    fn test_malformed_customer_filter_is_rejected() {
        let filter = AddressFilter {
            customer_id: Some("nope".to_string()),
            ..AddressFilter::default()
        };
        assert!(matches!(
            Address::filter_document(filter),
            Err(AppError::InvalidIdentifier(_))
        ));
    }
}
