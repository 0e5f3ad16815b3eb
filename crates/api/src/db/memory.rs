//! Process-local document store.
//!
//! Useful for tests and for running the service without MongoDB
//! (`STOREHOUSE_STORE=memory`). Matching follows MongoDB's equality rules
//! for the filters the service issues: a scalar condition on an array field
//! matches when any element equals it.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use parking_lot::RwLock;

use super::{DocumentStore, RepositoryError};

/// Thread-safe in-memory document store.
///
/// Collections keep insertion order. Every call to a [`DocumentStore`]
/// method increments [`MemoryStore::operation_count`].
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
    operations: Arc<AtomicUsize>,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations performed so far.
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.operations.load(Ordering::SeqCst)
    }

    /// Number of documents currently in `collection`.
    #[must_use]
    pub fn len(&self, collection: &str) -> usize {
        self.collections.read().get(collection).map_or(0, Vec::len)
    }

    /// Whether `collection` holds no documents.
    #[must_use]
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn record(&self) {
        self.operations.fetch_add(1, Ordering::SeqCst);
    }
}

fn has_id(doc: &Document, id: ObjectId) -> bool {
    matches!(doc.get("_id"), Some(Bson::ObjectId(stored)) if *stored == id)
}

fn matches_filter(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(field, expected)| match doc.get(field) {
        Some(Bson::Array(elements)) if !matches!(expected, Bson::Array(_)) => {
            elements.contains(expected)
        }
        Some(actual) => actual == expected,
        None => matches!(expected, Bson::Null),
    })
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(
        &self,
        collection: &str,
        doc: Document,
    ) -> Result<ObjectId, RepositoryError> {
        self.record();
        let id = match doc.get("_id") {
            Some(Bson::ObjectId(id)) => *id,
            Some(other) => {
                return Err(RepositoryError::DataCorruption(format!(
                    "memory store only supports ObjectId keys, got {other}"
                )));
            }
            None => ObjectId::new(),
        };

        // _id leads, as MongoDB stores it
        let mut stored = Document::new();
        stored.insert("_id", id);
        for (field, value) in doc {
            if field != "_id" {
                stored.insert(field, value);
            }
        }

        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .push(stored);
        Ok(id)
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: ObjectId,
    ) -> Result<Option<Document>, RepositoryError> {
        self.record();
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| has_id(doc, id)))
            .cloned())
    }

    async fn find(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Vec<Document>, RepositoryError> {
        self.record();
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matches_filter(doc, &filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: ObjectId,
        set: Document,
    ) -> Result<u64, RepositoryError> {
        self.record();
        let mut collections = self.collections.write();
        let Some(doc) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| has_id(doc, id)))
        else {
            return Ok(0);
        };
        for (field, value) in set {
            doc.insert(field, value);
        }
        Ok(1)
    }

    async fn delete_by_id(&self, collection: &str, id: ObjectId) -> Result<u64, RepositoryError> {
        self.record();
        let mut collections = self.collections.write();
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };
        match docs.iter().position(|doc| has_id(doc, id)) {
            Some(index) => {
                docs.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn ensure_index(&self, _collection: &str, _field: &str) -> Result<(), RepositoryError> {
        self.record();
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bson::doc;

    use super::*;

    #[tokio::test]
    async fn test_insert_assigns_id_first() {
        let store = MemoryStore::new();
        let id = store
            .insert_one("products", doc! { "name": "Pineapple" })
            .await
            .unwrap();

        let doc = store.find_by_id("products", id).await.unwrap().unwrap();
        assert_eq!(doc.keys().next().map(String::as_str), Some("_id"));
        assert_eq!(doc.get_object_id("_id").unwrap(), id);
        assert_eq!(doc.get_str("name").unwrap(), "Pineapple");
    }

    #[tokio::test]
    async fn test_find_filters_by_equality_and_array_membership() {
        let store = MemoryStore::new();
        let customer = ObjectId::new();
        store
            .insert_one("orders", doc! { "customerId": customer, "tags": ["gift", "rush"] })
            .await
            .unwrap();
        store
            .insert_one("orders", doc! { "customerId": ObjectId::new(), "tags": ["rush"] })
            .await
            .unwrap();

        let mine = store
            .find("orders", doc! { "customerId": customer })
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);

        let gifts = store.find("orders", doc! { "tags": "gift" }).await.unwrap();
        assert_eq!(gifts.len(), 1);

        let all = store.find("orders", Document::new()).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = MemoryStore::new();
        let id = store
            .insert_one("customers", doc! { "firstName": "Ada", "status": "active" })
            .await
            .unwrap();

        let matched = store
            .update_by_id("customers", id, doc! { "status": "inactive" })
            .await
            .unwrap();
        assert_eq!(matched, 1);

        let doc = store.find_by_id("customers", id).await.unwrap().unwrap();
        assert_eq!(doc.get_str("firstName").unwrap(), "Ada");
        assert_eq!(doc.get_str("status").unwrap(), "inactive");
    }

    #[tokio::test]
    async fn test_missing_documents_report_zero() {
        let store = MemoryStore::new();
        let id = ObjectId::new();
        assert_eq!(store.update_by_id("customers", id, doc! {}).await.unwrap(), 0);
        assert_eq!(store.delete_by_id("customers", id).await.unwrap(), 0);
        assert!(store.find_by_id("customers", id).await.unwrap().is_none());
        assert_eq!(store.operation_count(), 3);
    }

    #[tokio::test]
    async fn test_delete_removes_only_target() {
        let store = MemoryStore::new();
        let keep = store.insert_one("products", doc! { "n": 1 }).await.unwrap();
        let removed = store.insert_one("products", doc! { "n": 2 }).await.unwrap();

        assert_eq!(store.delete_by_id("products", removed).await.unwrap(), 1);
        assert_eq!(store.len("products"), 1);
        assert!(store.find_by_id("products", keep).await.unwrap().is_some());
    }
}
