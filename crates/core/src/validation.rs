//! Field constraints for write payloads.
//!
//! Enumerated fields are enforced by serde when a payload is deserialized.
//! Everything serde cannot express (numeric bounds, non-empty strings, `null`
//! on a required field of a patch) is checked by [`Validate`] before a payload
//! is handed to the store.

use thiserror::Error;

use crate::models::Patch;
use crate::types::Price;

/// A payload failed its field constraints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// A patch tried to clear a required field.
    #[error("{field} cannot be null")]
    NullNotAllowed { field: String },

    /// A numeric field is outside its allowed range.
    #[error("{field} {constraint}")]
    OutOfRange {
        field: String,
        constraint: &'static str,
    },

    /// An email field does not look like an address.
    #[error("{field} is not a valid email address")]
    InvalidEmail { field: String },

    /// A patch names no fields at all.
    #[error("update must set at least one field")]
    EmptyPatch,
}

/// Structured validation of a deserialized payload.
pub trait Validate {
    /// Check every constraint serde did not already enforce.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    fn validate(&self) -> Result<(), ValidationError>;
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn require_email(field: &str, value: &str) -> Result<(), ValidationError> {
    require_text(field, value)?;
    let valid = value.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty() && !domain.is_empty() && !domain.contains('@')
    });
    if !valid || value.len() > 254 {
        return Err(ValidationError::InvalidEmail {
            field: field.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn require_non_negative_price(field: &str, price: Price) -> Result<(), ValidationError> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            constraint: "must not be negative",
        });
    }
    Ok(())
}

pub(crate) fn require_non_negative(field: &str, value: i64) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            constraint: "must not be negative",
        });
    }
    Ok(())
}

pub(crate) fn require_positive(field: &str, value: i64) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            constraint: "must be greater than 0",
        });
    }
    Ok(())
}

/// Reject `null` on a required field and validate a set value with `check`.
pub(crate) fn required_patch<T>(
    field: &str,
    patch: &Patch<T>,
    check: impl FnOnce(&str, &T) -> Result<(), ValidationError>,
) -> Result<(), ValidationError> {
    match patch {
        Patch::Absent => Ok(()),
        Patch::Null => Err(ValidationError::NullNotAllowed {
            field: field.to_string(),
        }),
        Patch::Set(value) => check(field, value),
    }
}

/// Validate a set value of an optional field; `null` clears it.
pub(crate) fn optional_patch<T>(
    field: &str,
    patch: &Patch<T>,
    check: impl FnOnce(&str, &T) -> Result<(), ValidationError>,
) -> Result<(), ValidationError> {
    patch.as_set().map_or(Ok(()), |value| check(field, value))
}

pub(crate) const fn any<T>(_field: &str, _value: &T) -> Result<(), ValidationError> {
    Ok(())
}
