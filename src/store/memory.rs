//! In-memory store for tests

use crate::model::Resource;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::{Store, StoreError};

/// Keeps records in insertion order; `set_failing(true)` makes every call error
pub struct MemoryStore<R> {
    records: Mutex<Vec<R>>,
    failing: AtomicBool,
}

impl<R: Resource> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::unwrap_used)]
impl<R: Resource> MemoryStore<R> {
    pub fn new() -> Self {
        MemoryStore {
            records: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store set to fail".into()));
        }
        Ok(())
    }
}

#[async_trait]
#[allow(clippy::unwrap_used)]
impl<R: Resource> Store<R> for MemoryStore<R> {
    async fn find_all(&self) -> Result<Vec<R>, StoreError> {
        self.check()?;
        Ok(self.records.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<R>, StoreError> {
        self.check()?;
        let key = id.to_hex();
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id() == key)
            .cloned())
    }

    async fn insert(&self, id: &ObjectId, record: &R) -> Result<(), StoreError> {
        self.check()?;
        let mut stored = record.clone();
        stored.set_id(id.to_hex());
        self.records.lock().unwrap().push(stored);
        Ok(())
    }

    async fn replace(&self, id: &ObjectId, record: &R) -> Result<bool, StoreError> {
        self.check()?;
        let key = id.to_hex();
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|r| r.id() == key) {
            Some(slot) => {
                let mut stored = record.clone();
                stored.set_id(key);
                *slot = stored;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, StoreError> {
        self.check()?;
        let key = id.to_hex();
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id() != key);
        Ok(records.len() < before)
    }
}
