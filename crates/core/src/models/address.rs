//! Address documents.

use serde::{Deserialize, Serialize};

use super::{Entity, Patch};
use crate::types::{AddressId, AddressType, CustomerId};
use crate::validation::{Validate, ValidationError, any, optional_patch, require_text, required_patch};

/// A stored address. `customer_id` is a soft reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "_id")]
    pub id: AddressId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub address_type: Option<AddressType>,
}

impl Entity for Address {
    const COLLECTION: &'static str = "addresses";
    const NAME: &'static str = "address";
}

/// Payload for creating an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewAddress {
    pub customer_id: String,
    pub street: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    pub country: String,
    #[serde(rename = "type")]
    pub address_type: AddressType,
}

impl Validate for NewAddress {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("customerId", &self.customer_id)?;
        require_text("street", &self.street)?;
        require_text("city", &self.city)?;
        require_text("country", &self.country)
    }
}

/// Merge-patch for an address. `state` and `zip` may be cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddressPatch {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub customer_id: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub street: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub city: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub state: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub zip: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub country: Patch<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Patch::is_absent")]
    pub address_type: Patch<AddressType>,
}

impl Validate for AddressPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if self == &Self::default() {
            return Err(ValidationError::EmptyPatch);
        }
        required_patch("customerId", &self.customer_id, |f, v| require_text(f, v))?;
        required_patch("street", &self.street, |f, v| require_text(f, v))?;
        required_patch("city", &self.city, |f, v| require_text(f, v))?;
        optional_patch("state", &self.state, any)?;
        optional_patch("zip", &self.zip, any)?;
        required_patch("country", &self.country, |f, v| require_text(f, v))?;
        required_patch("type", &self.address_type, any)
    }
}
