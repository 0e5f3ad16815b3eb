//! Rewriting stored documents into their boundary form.
//!
//! Documents come out of the store with native [`ObjectId`](bson::oid::ObjectId)
//! values in `_id`, in reference fields such as `customerId`, and inside
//! embedded lists such as `items[].productId`. Before a document leaves the
//! system every one of those values is replaced by its hex string.

use bson::{Bson, Document};
use thiserror::Error;

use crate::models::Entity;
use crate::types::id::encode;

/// A stored document could not be read as its entity type.
#[derive(Debug, Error)]
#[error("malformed {entity} document: {source}")]
pub struct NormalizeError {
    pub entity: &'static str,
    #[source]
    pub source: bson::de::Error,
}

/// Replace every native identifier in `doc` with its string form.
///
/// Walks top-level fields, list elements and nested documents, so
/// `items[].productId` and an attached `items[].product._id` are covered.
/// Mutates `doc` in place. Idempotent.
pub fn normalize(doc: &mut Document) {
    for (_, value) in doc.iter_mut() {
        normalize_value(value);
    }
}

fn normalize_value(value: &mut Bson) {
    match value {
        Bson::ObjectId(id) => {
            let hex = encode(id);
            *value = Bson::String(hex);
        }
        Bson::Array(elements) => elements.iter_mut().for_each(normalize_value),
        Bson::Document(inner) => normalize(inner),
        _ => {}
    }
}

/// Normalize a stored document and read it as `E`.
///
/// # Errors
///
/// Returns [`NormalizeError`] if the document does not fit the entity shape
/// (for example a reference field holding something other than an id).
pub fn into_entity<E: Entity>(mut doc: Document) -> Result<E, NormalizeError> {
    normalize(&mut doc);
    bson::from_document(doc).map_err(|source| NormalizeError {
        entity: E::NAME,
        source,
    })
}
