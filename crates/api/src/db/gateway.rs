//! Per-collection CRUD over the shared document store.
//!
//! A [`CollectionGateway`] works on raw documents: identifiers are native
//! `ObjectId`s on the way in and stay native on the way out. Callers decode
//! path ids before calling in and normalize what comes back (see
//! [`CollectionGateway::fetch`] for the common case).

use std::marker::PhantomData;

use bson::Document;
use bson::oid::ObjectId;
use storehouse_core::{Entity, into_entity};

use super::{DocumentStore, RepositoryError};

/// CRUD operations for the collection of one entity kind.
pub struct CollectionGateway<'a, E: Entity> {
    store: &'a dyn DocumentStore,
    entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for CollectionGateway<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Entity> Copy for CollectionGateway<'_, E> {}

impl<'a, E: Entity> CollectionGateway<'a, E> {
    /// Create a gateway for `E`'s collection.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self {
            store,
            entity: PhantomData,
        }
    }

    fn not_found(id: ObjectId) -> RepositoryError {
        RepositoryError::NotFound {
            entity: E::NAME,
            id: id.to_hex(),
        }
    }

    /// Insert `doc` and return its new identifier.
    ///
    /// References inside `doc` are stored as given; link them first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the insert fails.
    pub async fn create(&self, doc: Document) -> Result<ObjectId, RepositoryError> {
        let id = self.store.insert_one(E::COLLECTION, doc).await?;
        tracing::debug!(collection = E::COLLECTION, id = %id, "Inserted document");
        Ok(id)
    }

    /// Fetch a document by id, if it exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the lookup fails.
    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<Document>, RepositoryError> {
        self.store.find_by_id(E::COLLECTION, id).await
    }

    /// Fetch a document by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no document has this id.
    /// Returns `RepositoryError::Store` if the lookup fails.
    pub async fn get_by_id(&self, id: ObjectId) -> Result<Document, RepositoryError> {
        self.find_by_id(id).await?.ok_or_else(|| {
            tracing::debug!(collection = E::COLLECTION, id = %id, "Document not found");
            Self::not_found(id)
        })
    }

    /// Fetch every document matching all equality conditions in `filter`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the query fails.
    pub async fn list(&self, filter: Document) -> Result<Vec<Document>, RepositoryError> {
        let docs = self.store.find(E::COLLECTION, filter).await?;
        tracing::debug!(collection = E::COLLECTION, count = docs.len(), "Listed documents");
        Ok(docs)
    }

    /// Merge `set` into the document with this id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no document matched.
    /// Returns `RepositoryError::Store` if the update fails.
    pub async fn update_by_id(&self, id: ObjectId, set: Document) -> Result<(), RepositoryError> {
        let fields = set.len();
        let matched = self.store.update_by_id(E::COLLECTION, id, set).await?;
        if matched == 0 {
            return Err(Self::not_found(id));
        }
        tracing::debug!(collection = E::COLLECTION, id = %id, fields, "Updated document");
        Ok(())
    }

    /// Delete the document with this id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if nothing was deleted.
    /// Returns `RepositoryError::Store` if the delete fails.
    pub async fn delete_by_id(&self, id: ObjectId) -> Result<(), RepositoryError> {
        let deleted = self.store.delete_by_id(E::COLLECTION, id).await?;
        if deleted == 0 {
            return Err(Self::not_found(id));
        }
        tracing::debug!(collection = E::COLLECTION, id = %id, "Deleted document");
        Ok(())
    }

    /// Fetch a document by id and read it as `E`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no document has this id.
    /// Returns `RepositoryError::DataCorruption` if the document does not fit `E`.
    pub async fn fetch(&self, id: ObjectId) -> Result<E, RepositoryError> {
        Ok(into_entity(self.get_by_id(id).await?)?)
    }

    /// Fetch every matching document and read each as `E`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` naming the `_id` of the first
    /// document that does not fit `E`.
    pub async fn fetch_all(&self, filter: Document) -> Result<Vec<E>, RepositoryError> {
        self.list(filter)
            .await?
            .into_iter()
            .map(|doc| {
                let id = doc.get_object_id("_id").map(|id| id.to_hex()).ok();
                into_entity(doc).map_err(|err| {
                    let id = id.as_deref().unwrap_or("without _id");
                    RepositoryError::DataCorruption(format!("{err} ({id})"))
                })
            })
            .collect()
    }
}
