//! Document identifiers and their external string form.
//!
//! MongoDB keys every document by an [`ObjectId`]. Inside the store, references
//! between collections are native ids; at the HTTP boundary they are always
//! 24-character hex strings. [`decode`] and [`encode`] are the only crossing
//! points between the two forms.
//!
//! Use the `define_id!` macro to create type-safe wrappers that prevent
//! accidentally mixing ids from different collections.

use bson::oid::ObjectId;
use thiserror::Error;

/// Length of the hex encoding of an [`ObjectId`].
pub const OBJECT_ID_HEX_LEN: usize = 24;

/// Errors that can occur when decoding an identifier string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The input is not exactly [`OBJECT_ID_HEX_LEN`] bytes long.
    #[error("identifier must be {expected} characters (got {actual})")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Length of the rejected input.
        actual: usize,
    },
    /// The input contains something other than hex digits.
    #[error("identifier must contain only hexadecimal digits")]
    InvalidCharacter,
}

/// Decode an external identifier string into a native [`ObjectId`].
///
/// Upper-case hex digits are accepted; [`encode`] always produces lower case.
///
/// # Errors
///
/// Returns [`IdError`] if `s` is not exactly 24 hex digits.
pub fn decode(s: &str) -> Result<ObjectId, IdError> {
    if s.len() != OBJECT_ID_HEX_LEN {
        return Err(IdError::InvalidLength {
            expected: OBJECT_ID_HEX_LEN,
            actual: s.len(),
        });
    }
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(IdError::InvalidCharacter);
    }
    ObjectId::parse_str(s).map_err(|_| IdError::InvalidCharacter)
}

/// Encode a native [`ObjectId`] as its lower-case hex string.
#[must_use]
pub fn encode(id: &ObjectId) -> String {
    id.to_hex()
}

/// Macro to define a type-safe identifier wrapper.
///
/// Creates a newtype wrapper around [`ObjectId`] with:
/// - `Serialize`/`Deserialize` as the hex string (the boundary form)
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Ord`
/// - `parse()` through [`decode`] and `Display` through [`encode`]
/// - `From<ObjectId>`, `Into<ObjectId>` and `Into<Bson>` (the stored form)
///
/// # Example
///
/// ```rust
/// # use storehouse_core::define_id;
/// define_id!(WarehouseId);
///
/// let id = WarehouseId::parse("65a1f0c2b3d4e5f601234567").unwrap();
/// assert_eq!(id.to_string(), "65a1f0c2b3d4e5f601234567");
/// assert!(WarehouseId::parse("not-an-id").is_err());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name($crate::bson::oid::ObjectId);

        impl $name {
            /// Wrap a native identifier.
            #[must_use]
            pub const fn new(id: $crate::bson::oid::ObjectId) -> Self {
                Self(id)
            }

            /// Parse the external hex form.
            ///
            /// # Errors
            ///
            /// Returns `IdError` if `s` is not a well-formed identifier.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::types::id::IdError> {
                $crate::types::id::decode(s).map(Self)
            }

            /// Get the underlying native identifier.
            #[must_use]
            pub const fn as_object_id(&self) -> $crate::bson::oid::ObjectId {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&$crate::types::id::encode(&self.0))
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<$crate::bson::oid::ObjectId> for $name {
            fn from(id: $crate::bson::oid::ObjectId) -> Self {
                Self(id)
            }
        }

        impl From<$name> for $crate::bson::oid::ObjectId {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<$name> for $crate::bson::Bson {
            fn from(id: $name) -> Self {
                $crate::bson::Bson::ObjectId(id.0)
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                serializer.serialize_str(&$crate::types::id::encode(&self.0))
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let raw = <::std::string::String as ::serde::Deserialize>::deserialize(deserializer)?;
                Self::parse(&raw).map_err(<D::Error as ::serde::de::Error>::custom)
            }
        }
    };
}

// Define standard entity IDs
define_id!(CustomerId);
define_id!(AddressId);
define_id!(OrderId);
define_id!(ProductId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const HEX: &str = "65a1f0c2b3d4e5f601234567";

    #[test]
    fn test_decode_encode_round_trip() {
        let id = decode(HEX).unwrap();
        assert_eq!(encode(&id), HEX);
    }

    #[test]
    fn test_encode_decode_round_trip_generated() {
        for _ in 0..16 {
            let id = ObjectId::new();
            assert_eq!(decode(&encode(&id)).unwrap(), id);
        }
    }

    #[test]
    fn test_decode_upper_case_canonicalizes() {
        let id = decode(&HEX.to_uppercase()).unwrap();
        assert_eq!(encode(&id), HEX);
    }

    #[test]
    fn test_decode_wrong_length() {
        assert_eq!(
            decode("65a1f0c2").unwrap_err(),
            IdError::InvalidLength {
                expected: 24,
                actual: 8
            }
        );
        assert!(matches!(
            decode(""),
            Err(IdError::InvalidLength { actual: 0, .. })
        ));
        assert!(matches!(
            decode(&format!("{HEX}0")),
            Err(IdError::InvalidLength { actual: 25, .. })
        ));
    }

    #[test]
    fn test_decode_wrong_charset() {
        assert_eq!(
            decode("65a1f0c2b3d4e5f60123456z").unwrap_err(),
            IdError::InvalidCharacter
        );
        assert_eq!(
            decode("65a1f0c2b3d4e5f6-1234567").unwrap_err(),
            IdError::InvalidCharacter
        );
    }

    #[test]
    fn test_decode_multibyte_input_is_rejected() {
        // 12 two-byte characters: right byte length, wrong grammar
        let input = "éééééééééééé";
        assert_eq!(input.len(), 24);
        assert_eq!(decode(input).unwrap_err(), IdError::InvalidCharacter);
    }

    #[test]
    fn test_typed_id_display_and_parse() {
        let id: CustomerId = HEX.parse().unwrap();
        assert_eq!(id.to_string(), HEX);
        assert_eq!(CustomerId::new(id.as_object_id()), id);
    }

    #[test]
    fn test_typed_id_serde_is_hex_string() {
        let id = ProductId::parse(HEX).unwrap();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::json!(HEX));

        let back: ProductId = serde_json::from_value(json).unwrap();
        assert_eq!(back, id);

        let err = serde_json::from_value::<ProductId>(serde_json::json!("nope"));
        assert!(err.is_err());
    }

    #[test]
    fn test_typed_id_into_bson_is_native() {
        let id = OrderId::parse(HEX).unwrap();
        let bson: bson::Bson = id.into();
        assert_eq!(bson, bson::Bson::ObjectId(id.as_object_id()));
    }
}
