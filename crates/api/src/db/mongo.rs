//! MongoDB-backed document store.

use std::time::Duration;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Document, doc};
use futures::TryStreamExt;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use secrecy::{ExposeSecret, SecretString};

use super::{DocumentStore, RepositoryError};

/// Document store over one MongoDB database.
///
/// Cloning is cheap; the underlying client keeps its own connection pool.
#[derive(Clone, Debug)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Build a client for `uri` and select `database`.
    ///
    /// The driver connects lazily, so an unreachable server surfaces on the
    /// first operation (or [`DocumentStore::ping`]) rather than here.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the connection string is invalid.
    pub async fn connect(uri: &SecretString, database: &str) -> Result<Self, RepositoryError> {
        let mut options = ClientOptions::parse(uri.expose_secret()).await?;
        options.app_name = Some("storehouse".to_string());
        options.server_selection_timeout = Some(Duration::from_secs(10));
        options.connect_timeout = Some(Duration::from_secs(10));

        let client = Client::with_options(options)?;
        Ok(Self {
            database: client.database(database),
        })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert_one(
        &self,
        collection: &str,
        doc: Document,
    ) -> Result<ObjectId, RepositoryError> {
        let result = self.collection(collection).insert_one(doc).await?;
        result.inserted_id.as_object_id().ok_or_else(|| {
            RepositoryError::DataCorruption(format!(
                "inserted {collection} document has a non-ObjectId _id: {}",
                result.inserted_id
            ))
        })
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: ObjectId,
    ) -> Result<Option<Document>, RepositoryError> {
        Ok(self
            .collection(collection)
            .find_one(doc! { "_id": id })
            .await?)
    }

    async fn find(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Vec<Document>, RepositoryError> {
        let cursor = self.collection(collection).find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: ObjectId,
        set: Document,
    ) -> Result<u64, RepositoryError> {
        let result = self
            .collection(collection)
            .update_one(doc! { "_id": id }, doc! { "$set": set })
            .await?;
        Ok(result.matched_count)
    }

    async fn delete_by_id(&self, collection: &str, id: ObjectId) -> Result<u64, RepositoryError> {
        let result = self
            .collection(collection)
            .delete_one(doc! { "_id": id })
            .await?;
        Ok(result.deleted_count)
    }

    async fn ensure_index(&self, collection: &str, field: &str) -> Result<(), RepositoryError> {
        let mut keys = Document::new();
        keys.insert(field, 1);
        let index = IndexModel::builder().keys(keys).build();
        self.collection(collection).create_index(index).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
