//! Customer documents.

use serde::{Deserialize, Serialize};

use super::{Entity, Patch};
use crate::types::{CustomerId, CustomerStatus};
use crate::validation::{
    Validate, ValidationError, any, optional_patch, require_email, require_text, required_patch,
};

/// A stored customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: CustomerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CustomerStatus>,
}

impl Entity for Customer {
    const COLLECTION: &'static str = "customers";
    const NAME: &'static str = "customer";
}

/// Payload for creating a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: CustomerStatus,
}

impl Validate for NewCustomer {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("firstName", &self.first_name)?;
        require_text("lastName", &self.last_name)?;
        require_email("email", &self.email)
    }
}

/// Merge-patch for a customer. `phone` is the only clearable field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CustomerPatch {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub first_name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub last_name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub email: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub phone: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub status: Patch<CustomerStatus>,
}

impl Validate for CustomerPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if self == &Self::default() {
            return Err(ValidationError::EmptyPatch);
        }
        required_patch("firstName", &self.first_name, |f, v| require_text(f, v))?;
        required_patch("lastName", &self.last_name, |f, v| require_text(f, v))?;
        required_patch("email", &self.email, |f, v| require_email(f, v))?;
        optional_patch("phone", &self.phone, any)?;
        required_patch("status", &self.status, any)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_customer() -> NewCustomer {
        serde_json::from_value(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com"
        }))
        .unwrap()
    }

    #[test]
    fn test_new_customer_defaults_to_active() {
        let customer = new_customer();
        assert_eq!(customer.status, CustomerStatus::Active);
        assert!(customer.validate().is_ok());
    }

    #[test]
    fn test_new_customer_rejects_bad_input() {
        let mut customer = new_customer();
        customer.email = "ada".to_string();
        assert!(matches!(
            customer.validate(),
            Err(ValidationError::InvalidEmail { .. })
        ));

        let unknown = serde_json::from_value::<NewCustomer>(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "status": "banned"
        }));
        assert!(unknown.is_err());
    }

    #[test]
    fn test_patch_status_only_serializes_status() {
        let patch: CustomerPatch = serde_json::from_value(json!({"status": "inactive"})).unwrap();
        assert!(patch.validate().is_ok());
        assert_eq!(
            bson::to_document(&patch).unwrap(),
            bson::doc! { "status": "inactive" }
        );
    }

    #[test]
    fn test_patch_rules() {
        let empty = CustomerPatch::default();
        assert_eq!(empty.validate(), Err(ValidationError::EmptyPatch));

        let clear_phone: CustomerPatch = serde_json::from_value(json!({"phone": null})).unwrap();
        assert!(clear_phone.validate().is_ok());

        let clear_name: CustomerPatch =
            serde_json::from_value(json!({"firstName": null})).unwrap();
        assert!(matches!(
            clear_name.validate(),
            Err(ValidationError::NullNotAllowed { .. })
        ));
    }

    #[test]
    fn test_stored_customer_tolerates_missing_fields() {
        let customer: Customer =
            serde_json::from_value(json!({"_id": "65a1f0c2b3d4e5f601234567"})).unwrap();
        assert_eq!(customer.first_name, None);
        assert_eq!(
            serde_json::to_value(&customer).unwrap(),
            json!({"_id": "65a1f0c2b3d4e5f601234567"})
        );
    }
}
