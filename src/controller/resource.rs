//! Generic CRUD controller for one resource collection
//!
//! One `ResourceController` is instantiated per record type. Apart from the
//! record schema and the collection, the two instances differ only in their
//! `GenerateTarget`: which template they render, where the result goes, and
//! which downstream service gets reloaded afterwards.
//!
//! Identifier handling follows a single rule: a malformed identifier and an
//! unknown identifier are the same outcome, `ControllerError::NotFound`.

use crate::controller::clock::Clock;
use crate::controller::reload::{ReloadError, ReloadNotifier};
use crate::controller::render::{render_to_file, RenderError};
use crate::model::Resource;
use crate::store::{parse_id, Store, StoreError};
use mongodb::bson::oid::ObjectId;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Record not found")]
    NotFound,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to render configuration: {0}")]
    Render(#[from] RenderError),

    #[error("Failed to reload downstream service: {0}")]
    Reload(#[from] ReloadError),
}

/// Where `generate` renders from and to, and which service it reloads
#[derive(Debug, Clone)]
pub struct GenerateTarget {
    pub template: PathBuf,
    pub output: PathBuf,
    pub reload_url: String,
}

pub struct ResourceController<R: Resource> {
    store: Arc<dyn Store<R>>,
    notifier: Arc<dyn ReloadNotifier>,
    clock: Arc<dyn Clock>,
    target: GenerateTarget,
}

impl<R: Resource> ResourceController<R> {
    pub fn new(
        store: Arc<dyn Store<R>>,
        notifier: Arc<dyn ReloadNotifier>,
        clock: Arc<dyn Clock>,
        target: GenerateTarget,
    ) -> Self {
        ResourceController {
            store,
            notifier,
            clock,
            target,
        }
    }

    /// All records in the collection
    pub async fn list(&self) -> Result<Vec<R>, ControllerError> {
        Ok(self.store.find_all().await?)
    }

    pub async fn get(&self, raw_id: &str) -> Result<R, ControllerError> {
        let id = parse_id(raw_id).ok_or(ControllerError::NotFound)?;
        self.store
            .find_by_id(&id)
            .await?
            .ok_or(ControllerError::NotFound)
    }

    /// Persist a new record
    ///
    /// The identifier and both timestamps are assigned here; whatever the
    /// client sent for them is overwritten.
    pub async fn create(&self, mut record: R) -> Result<R, ControllerError> {
        let id = ObjectId::new();
        let now = self.clock.now();

        record.set_id(id.to_hex());
        record.set_created(now);
        record.set_last_updated(now);

        self.store.insert(&id, &record).await?;
        info!(resource = R::COLLECTION, id = %id, "Created {}", R::KIND);

        Ok(record)
    }

    /// Replace the record at `raw_id` with `record`
    ///
    /// The URL identifier wins over any `id` in the payload, and the stored
    /// `created` timestamp is kept. Store failures are reported as NotFound.
    pub async fn update(&self, raw_id: &str, mut record: R) -> Result<R, ControllerError> {
        let id = parse_id(raw_id).ok_or(ControllerError::NotFound)?;

        let existing = self
            .store
            .find_by_id(&id)
            .await
            .map_err(|e| self.rejected("update", &id, e))?
            .ok_or(ControllerError::NotFound)?;

        // lastUpdated never moves backwards, even if the clock does
        let now = self.clock.now().max(existing.last_updated());

        record.set_id(id.to_hex());
        record.set_created(existing.created());
        record.set_last_updated(now);

        let matched = self
            .store
            .replace(&id, &record)
            .await
            .map_err(|e| self.rejected("update", &id, e))?;
        if !matched {
            // Deleted between lookup and replace
            return Err(ControllerError::NotFound);
        }

        info!(resource = R::COLLECTION, id = %id, "Updated {}", R::KIND);
        Ok(record)
    }

    /// Hard-delete the record at `raw_id`
    pub async fn delete(&self, raw_id: &str) -> Result<(), ControllerError> {
        let id = parse_id(raw_id).ok_or(ControllerError::NotFound)?;

        let removed = self
            .store
            .delete(&id)
            .await
            .map_err(|e| self.rejected("delete", &id, e))?;
        if !removed {
            return Err(ControllerError::NotFound);
        }

        info!(resource = R::COLLECTION, id = %id, "Deleted {}", R::KIND);
        Ok(())
    }

    /// Render the whole collection into the target file, then reload
    ///
    /// A render failure stops before the reload call. A reload failure is
    /// returned after the file has already been written.
    pub async fn generate(&self) -> Result<(), ControllerError> {
        let records = self.list().await?;
        debug!(
            resource = R::COLLECTION,
            count = records.len(),
            "Generating configuration"
        );

        render_to_file(&self.target.output, &self.target.template, &records).await?;
        self.notifier.reload(&self.target.reload_url).await?;

        info!(
            resource = R::COLLECTION,
            output = %self.target.output.display(),
            reload_url = %self.target.reload_url,
            "Configuration generated and reload triggered"
        );
        Ok(())
    }

    fn rejected(&self, operation: &str, id: &ObjectId, error: StoreError) -> ControllerError {
        warn!(
            resource = R::COLLECTION,
            id = %id,
            operation,
            error = %error,
            "Store rejected request, reporting not found"
        );
        ControllerError::NotFound
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[path = "resource_test.rs"]
mod tests;
