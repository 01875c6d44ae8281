//! Create/update/delete against the remote API with in-place reconciliation
//! of the local result list.
//!
//! The remote service does not persist these mutations, so `total` is never
//! adjusted; local state changes only after the remote call succeeds.

use std::fmt;

use serde_json::Value;
use storefront_types::{CatalogResult, Item, ItemFields, ItemId};
use tracing::{debug, warn};

use crate::api::ApiClient;

/// Which mutation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

/// A create/update/delete failed. Local state was not touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationError {
    pub op: MutationKind,
}

impl MutationError {
    fn new(op: MutationKind) -> Self {
        Self { op }
    }
}

impl fmt::Display for MutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op {
            MutationKind::Create | MutationKind::Update => {
                write!(f, "Failed to save product. Please check your input.")
            }
            MutationKind::Delete => write!(f, "Failed to delete product. Please try again."),
        }
    }
}

impl std::error::Error for MutationError {}

/// Status the delete endpoint must answer with.
const DELETE_OK: u16 = 200;

#[derive(Debug, Clone)]
pub struct MutationCoordinator {
    api: ApiClient,
}

impl MutationCoordinator {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Creates an item and prepends it to `result`.
    ///
    /// # Errors
    /// Returns [`MutationError`] on validation or remote failure.
    pub async fn create(
        &self,
        result: &mut CatalogResult,
        fields: &ItemFields,
    ) -> Result<Item, MutationError> {
        let op = MutationKind::Create;
        validate(fields, op)?;

        let item = self.api.add_product(fields).await.map_err(|err| {
            warn!(error = %err, "create failed");
            MutationError::new(op)
        })?;

        result.items.insert(0, item.clone());
        debug!(id = item.id, "item created");
        Ok(item)
    }

    /// Updates an item and merges the response over the local copy.
    ///
    /// Fields missing from the response keep their local value. If `id` is
    /// not in `result`, the list is left alone and the item built from the
    /// response is returned.
    ///
    /// # Errors
    /// Returns [`MutationError`] on validation or remote failure, or when the
    /// response cannot be merged.
    pub async fn update(
        &self,
        result: &mut CatalogResult,
        id: ItemId,
        fields: &ItemFields,
    ) -> Result<Item, MutationError> {
        let op = MutationKind::Update;
        validate(fields, op)?;

        let mut patch = self.api.update_product(id, fields).await.map_err(|err| {
            warn!(error = %err, id, "update failed");
            MutationError::new(op)
        })?;

        let merged = match result.position(id) {
            Some(pos) => result.items[pos].merged_with(&patch),
            None => {
                patch.entry("id").or_insert_with(|| Value::from(id));
                serde_json::from_value(Value::Object(patch))
            }
        }
        .map_err(|err| {
            warn!(error = %err, id, "update response could not be merged");
            MutationError::new(op)
        })?;

        if let Some(pos) = result.position(id) {
            result.items[pos] = merged.clone();
        }
        debug!(id, "item updated");
        Ok(merged)
    }

    /// Deletes an item and removes it from `result`.
    ///
    /// Requires an explicit 200 from the API. Deleting an id that is not in
    /// the list still calls the API and leaves the list unchanged.
    ///
    /// # Errors
    /// Returns [`MutationError`] on remote failure or any other status.
    pub async fn delete(
        &self,
        result: &mut CatalogResult,
        id: ItemId,
    ) -> Result<(), MutationError> {
        let op = MutationKind::Delete;
        let status = self.api.delete_product(id).await.map_err(|err| {
            warn!(error = %err, id, "delete failed");
            MutationError::new(op)
        })?;

        if status != DELETE_OK {
            warn!(status, id, "delete answered without explicit success");
            return Err(MutationError::new(op));
        }

        if let Some(pos) = result.position(id) {
            result.items.remove(pos);
        }
        debug!(id, "item deleted");
        Ok(())
    }
}

fn validate(fields: &ItemFields, op: MutationKind) -> Result<(), MutationError> {
    fields.validate().map_err(|err| {
        debug!(reason = %err, "rejected invalid item fields");
        MutationError::new(op)
    })
}
