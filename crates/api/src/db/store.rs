//! The document store seam.

use async_trait::async_trait;
use bson::Document;
use bson::oid::ObjectId;

use super::RepositoryError;

/// The primitive operations every collection supports.
///
/// Each call is a single atomic store operation. Nothing here spans more
/// than one document or collection, and implementations keep no state
/// between calls beyond the stored documents themselves.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document and return its newly generated `_id`.
    async fn insert_one(&self, collection: &str, doc: Document)
    -> Result<ObjectId, RepositoryError>;

    /// Fetch the document with the given `_id`.
    async fn find_by_id(
        &self,
        collection: &str,
        id: ObjectId,
    ) -> Result<Option<Document>, RepositoryError>;

    /// Fetch every document matching all equality conditions in `filter`.
    ///
    /// An empty filter matches the whole collection. Results come back in
    /// whatever order the store returns them.
    async fn find(&self, collection: &str, filter: Document)
    -> Result<Vec<Document>, RepositoryError>;

    /// `$set` the fields of `set` on the document with the given `_id`.
    ///
    /// Returns the number of matched documents (0 or 1).
    async fn update_by_id(
        &self,
        collection: &str,
        id: ObjectId,
        set: Document,
    ) -> Result<u64, RepositoryError>;

    /// Delete the document with the given `_id`.
    ///
    /// Returns the number of deleted documents (0 or 1).
    async fn delete_by_id(&self, collection: &str, id: ObjectId) -> Result<u64, RepositoryError>;

    /// Create an ascending single-field index if it does not already exist.
    async fn ensure_index(&self, collection: &str, field: &str) -> Result<(), RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}
