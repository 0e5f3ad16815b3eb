//! Resolving cross-collection references in write payloads.
//!
//! Payloads carry references (`customerId`, `items[].productId`) as strings.
//! Before a document is persisted each reference is decoded and replaced by
//! its native `ObjectId`, so the stored form can be matched by the composite
//! lookups. A malformed reference fails the whole write; nothing is stored.
//!
//! Whether the referenced document exists is a separate, opt-in check
//! ([`ReferencePolicy::MustExist`]). By default references are soft: a
//! well-formed id pointing at nothing is accepted.

use bson::oid::ObjectId;
use bson::{Bson, Document};
use storehouse_core::models::{Customer, Product};
use storehouse_core::{Entity, IdError, decode};
use thiserror::Error;

use crate::db::{DocumentStore, RepositoryError};

const CUSTOMER_ID: &str = "customerId";
const ITEMS: &str = "items";
const PRODUCT_ID: &str = "productId";

/// A reference could not be linked.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The reference is not a well-formed identifier.
    #[error("{field}: {source}")]
    InvalidIdentifier {
        field: String,
        #[source]
        source: IdError,
    },

    /// The reference field holds something other than a string id.
    #[error("{field} must be an identifier string")]
    NotAnIdentifier { field: String },

    /// The reference is well-formed but points at nothing.
    #[error("{field} references a missing {entity} {id}")]
    MissingReference {
        field: String,
        entity: &'static str,
        id: String,
    },

    /// An existence check could not be performed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// How strictly references are checked before a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferencePolicy {
    /// References must be well-formed identifiers.
    #[default]
    WellFormed,
    /// References must also point at an existing document.
    MustExist,
}

/// Which references a collection's write payloads carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum References {
    /// No references.
    None,
    /// `customerId`.
    Customer,
    /// `customerId` and `items[].productId`.
    Order,
}

/// A reference that was decoded in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub field: String,
    pub entity: &'static str,
    pub collection: &'static str,
    pub id: ObjectId,
}

/// Decode one reference value, accepting ids that are already native.
fn decode_reference(field: &str, value: &Bson) -> Result<ObjectId, LinkError> {
    match value {
        Bson::String(raw) => decode(raw).map_err(|source| LinkError::InvalidIdentifier {
            field: field.to_string(),
            source,
        }),
        Bson::ObjectId(id) => Ok(*id),
        _ => Err(LinkError::NotAnIdentifier {
            field: field.to_string(),
        }),
    }
}

/// Link `customerId` in place, if the document has one.
///
/// # Errors
///
/// Returns `LinkError::InvalidIdentifier` if the value is malformed.
pub fn link_customer(doc: &mut Document) -> Result<Option<Link>, LinkError> {
    let Some(value) = doc.get(CUSTOMER_ID) else {
        return Ok(None);
    };
    let id = decode_reference(CUSTOMER_ID, value)?;
    doc.insert(CUSTOMER_ID, id);
    Ok(Some(Link {
        field: CUSTOMER_ID.to_string(),
        entity: Customer::NAME,
        collection: Customer::COLLECTION,
        id,
    }))
}

/// Link `productId` of every element of `items` in place.
///
/// Each item is linked independently; an empty or absent `items` links
/// nothing. Any malformed item fails the whole document.
///
/// # Errors
///
/// Returns `LinkError::InvalidIdentifier` naming the first malformed item.
pub fn link_items(doc: &mut Document) -> Result<Vec<Link>, LinkError> {
    let Some(Bson::Array(items)) = doc.get_mut(ITEMS) else {
        return Ok(Vec::new());
    };

    let mut links = Vec::with_capacity(items.len());
    for (index, item) in items.iter_mut().enumerate() {
        let Bson::Document(item) = item else {
            return Err(LinkError::NotAnIdentifier {
                field: format!("{ITEMS}[{index}].{PRODUCT_ID}"),
            });
        };
        let field = format!("{ITEMS}[{index}].{PRODUCT_ID}");
        let value = item.get(PRODUCT_ID).ok_or_else(|| LinkError::NotAnIdentifier {
            field: field.clone(),
        })?;
        let id = decode_reference(&field, value)?;
        item.insert(PRODUCT_ID, id);
        links.push(Link {
            field,
            entity: Product::NAME,
            collection: Product::COLLECTION,
            id,
        });
    }
    Ok(links)
}

/// Links write payloads and applies the configured [`ReferencePolicy`].
pub struct ReferentialLinker<'a> {
    store: &'a dyn DocumentStore,
    policy: ReferencePolicy,
}

impl<'a> ReferentialLinker<'a> {
    /// Create a linker over `store`.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore, policy: ReferencePolicy) -> Self {
        Self { store, policy }
    }

    /// The store references are checked against.
    #[must_use]
    pub const fn store(&self) -> &'a dyn DocumentStore {
        self.store
    }

    /// Link whichever references `doc` is declared to carry.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if a reference is malformed, or missing under
    /// [`ReferencePolicy::MustExist`].
    pub async fn link(&self, references: References, doc: &mut Document) -> Result<(), LinkError> {
        match references {
            References::None => Ok(()),
            References::Customer => self.link_address(doc).await,
            References::Order => self.link_order(doc).await,
        }
    }

    /// Link an address payload (`customerId`).
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the reference is malformed, or missing under
    /// [`ReferencePolicy::MustExist`].
    pub async fn link_address(&self, doc: &mut Document) -> Result<(), LinkError> {
        let links: Vec<Link> = link_customer(doc)?.into_iter().collect();
        self.verify(&links).await
    }

    /// Link an order payload (`customerId` and every `items[].productId`).
    ///
    /// On update, a payload carrying `items` replaces the whole sequence, so
    /// every element is re-linked.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if any reference is malformed, or missing under
    /// [`ReferencePolicy::MustExist`].
    pub async fn link_order(&self, doc: &mut Document) -> Result<(), LinkError> {
        let mut links: Vec<Link> = link_customer(doc)?.into_iter().collect();
        links.extend(link_items(doc)?);
        self.verify(&links).await
    }

    async fn verify(&self, links: &[Link]) -> Result<(), LinkError> {
        if self.policy == ReferencePolicy::WellFormed {
            return Ok(());
        }
        for link in links {
            if self.store.find_by_id(link.collection, link.id).await?.is_none() {
                tracing::debug!(field = %link.field, id = %link.id, "Reference target missing");
                return Err(LinkError::MissingReference {
                    field: link.field.clone(),
                    entity: link.entity,
                    id: link.id.to_hex(),
                });
            }
        }
        Ok(())
    }
}
