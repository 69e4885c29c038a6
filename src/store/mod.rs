//! Document storage for resource collections
//!
//! The `Store` trait is the seam between the resource controller and the
//! database. Production code uses `MongoStore`; tests use `MemoryStore`,
//! which keeps records in a `Vec` and can be switched into a failing mode.

pub mod mongo;

#[cfg(test)]
pub mod memory;

pub use mongo::{connect, MongoStore};

use crate::model::Resource;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Failed to encode document: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),

    #[error("Failed to decode document: {0}")]
    Decode(#[from] mongodb::bson::de::Error),

    #[error("Stored document has no ObjectId _id")]
    MissingId,

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Parse a client-supplied identifier
///
/// Anything that is not a 24-character hex string yields `None`. Callers
/// report that the same way as a missing record.
pub fn parse_id(raw: &str) -> Option<ObjectId> {
    ObjectId::parse_str(raw).ok()
}

/// Access to one collection of records
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait Store<R: Resource>: Send + Sync {
    /// All records, in no particular order
    async fn find_all(&self) -> Result<Vec<R>, StoreError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<R>, StoreError>;

    /// Persist a new record under `id`, ignoring whatever `record.id()` holds
    async fn insert(&self, id: &ObjectId, record: &R) -> Result<(), StoreError>;

    /// Replace the record stored under `id`
    ///
    /// Returns `false` when no record matched.
    async fn replace(&self, id: &ObjectId, record: &R) -> Result<bool, StoreError>;

    /// Returns `false` when no record matched.
    async fn delete(&self, id: &ObjectId) -> Result<bool, StoreError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[path = "store_test.rs"]
mod tests;
