//! MongoDB-backed store
//!
//! Records keep their identifier in `id` on the wire; in MongoDB it lives in
//! the document's `_id` as a native ObjectId. The conversion happens here and
//! nowhere else.

use crate::model::Resource;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Document};
use mongodb::{Client, Collection, Database};
use std::marker::PhantomData;
use tracing::{debug, info};

use super::{Store, StoreError};

/// Connect to MongoDB and verify the server answers
///
/// The returned handle wraps a connection pool and is cheap to clone.
pub async fn connect(uri: &str, database: &str) -> Result<Database, StoreError> {
    let client = Client::with_uri_str(uri).await?;
    let database = client.database(database);

    // The driver connects lazily; ping so an unreachable server fails startup
    database.run_command(doc! { "ping": 1 }).await?;
    info!(database = %database.name(), "Connected to MongoDB");

    Ok(database)
}

/// Encode a record for storage under `id`
pub(crate) fn to_storage_document<R: Resource>(
    id: &ObjectId,
    record: &R,
) -> Result<Document, StoreError> {
    let mut document = bson::to_document(record)?;
    document.remove("id");
    document.insert("_id", *id);
    Ok(document)
}

/// Decode a stored document back into a record
pub(crate) fn from_storage_document<R: Resource>(
    mut document: Document,
) -> Result<R, StoreError> {
    let id = document
        .get_object_id("_id")
        .map_err(|_| StoreError::MissingId)?;
    document.remove("_id");

    let mut record: R = bson::from_document(document)?;
    record.set_id(id.to_hex());
    Ok(record)
}

/// Store for the collection named by `R::COLLECTION`
pub struct MongoStore<R> {
    collection: Collection<Document>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Resource> MongoStore<R> {
    pub fn new(database: &Database) -> Self {
        MongoStore {
            collection: database.collection(R::COLLECTION),
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<R: Resource> Store<R> for MongoStore<R> {
    async fn find_all(&self) -> Result<Vec<R>, StoreError> {
        let cursor = self.collection.find(doc! {}).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;

        debug!(
            collection = R::COLLECTION,
            count = documents.len(),
            "Loaded collection"
        );

        documents.into_iter().map(from_storage_document::<R>).collect()
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<R>, StoreError> {
        self.collection
            .find_one(doc! { "_id": *id })
            .await?
            .map(from_storage_document::<R>)
            .transpose()
    }

    async fn insert(&self, id: &ObjectId, record: &R) -> Result<(), StoreError> {
        let document = to_storage_document(id, record)?;
        self.collection.insert_one(document).await?;
        Ok(())
    }

    async fn replace(&self, id: &ObjectId, record: &R) -> Result<bool, StoreError> {
        let document = to_storage_document(id, record)?;
        let result = self
            .collection
            .replace_one(doc! { "_id": *id }, document)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, StoreError> {
        let result = self.collection.delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count > 0)
    }
}
