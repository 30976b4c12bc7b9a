//! Item use cases: list, create, update, delete.
//!
//! Orchestrates validation, the uniqueness pre-check and the store write for
//! each request:
//!
//! ```text
//! ItemForm
//!   ↓
//! 1. Field rules (ItemForm::validate)      → ItemError::Validation
//!   ↓
//! 2. Uniqueness pre-check (store read)     → ItemError::Conflict
//!   ↓
//! 3. Store write (atomic, rolled back on failure)
//!                                          → ItemError::Conflict (constraint race)
//!                                          → ItemError::Persistence
//! ```
//!
//! The pre-check and the write are not one transaction. Two concurrent
//! submissions can both pass step 2; the store's unique constraints decide
//! which one wins, and the loser gets the same `Conflict` as if step 2 had
//! caught it.

use thiserror::Error;

use stockbook_core::ItemId;
use stockbook_inventory::{ConflictField, InventoryItem, ItemForm};

use crate::store::{ItemStore, StoreError};

/// Shown to users when the store fails; details go to the log only.
pub const GENERIC_FAILURE: &str = "Something went wrong while saving. Please try again.";

/// Shown on the list page when items cannot be loaded.
pub const LIST_FAILURE: &str = "Could not load inventory items. Please try again later.";

/// Outcome of a failed item use case.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ItemError {
    /// One or more field rules failed; nothing was written.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    /// MAC address or serial number already belongs to another item.
    #[error("{}", .0.message())]
    Conflict(ConflictField),
    #[error("item {0} not found")]
    NotFound(ItemId),
    /// The store write failed and was rolled back.
    #[error("persistence failure: {0}")]
    Persistence(StoreError),
}

impl ItemError {
    /// Messages suitable for showing next to the form.
    pub fn messages(&self) -> Vec<String> {
        match self {
            ItemError::Validation(errors) => errors.clone(),
            ItemError::Conflict(field) => vec![field.message().to_string()],
            ItemError::NotFound(_) => vec!["Item not found".to_string()],
            ItemError::Persistence(_) => vec![GENERIC_FAILURE.to_string()],
        }
    }
}

impl From<StoreError> for ItemError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Conflict(field) => ItemError::Conflict(field),
            StoreError::NotFound(id) => ItemError::NotFound(id),
            other => {
                tracing::error!("store failure: {other}");
                ItemError::Persistence(other)
            }
        }
    }
}

/// Items for the list page, plus a notice when loading failed.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub items: Vec<InventoryItem>,
    pub error: Option<&'static str>,
}

/// Item use cases over an injected store.
#[derive(Debug, Clone)]
pub struct ItemService<S> {
    store: S,
}

impl<S> ItemService<S>
where
    S: ItemStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All items; a store failure yields an empty list and a notice.
    pub async fn list(&self) -> Listing {
        match self.store.list().await {
            Ok(items) => {
                tracing::info!(count = items.len(), "retrieved items");
                Listing { items, error: None }
            }
            Err(e) => {
                tracing::error!("listing items failed: {e}");
                Listing {
                    items: Vec::new(),
                    error: Some(LIST_FAILURE),
                }
            }
        }
    }

    pub async fn get(&self, id: ItemId) -> Result<InventoryItem, ItemError> {
        self.store.get(id).await?.ok_or(ItemError::NotFound(id))
    }

    pub async fn create(&self, form: &ItemForm) -> Result<InventoryItem, ItemError> {
        let draft = form.validate().map_err(ItemError::Validation)?;

        if let Some(field) = self.store.find_conflict(&draft, None).await? {
            tracing::info!(?field, "create rejected: duplicate value");
            return Err(ItemError::Conflict(field));
        }

        let item = self.store.insert(draft).await?;
        tracing::info!(item_id = %item.id, "item created");
        Ok(item)
    }

    pub async fn update(&self, id: ItemId, form: &ItemForm) -> Result<InventoryItem, ItemError> {
        let mut item = self.get(id).await?;
        let draft = form.validate().map_err(ItemError::Validation)?;

        if let Some(field) = self.store.find_conflict(&draft, Some(id)).await? {
            tracing::info!(item_id = %id, ?field, "update rejected: duplicate value");
            return Err(ItemError::Conflict(field));
        }

        item.apply(draft);
        self.store.update(&item).await?;
        tracing::info!(item_id = %id, "item updated");
        Ok(item)
    }

    pub async fn delete(&self, id: ItemId) -> Result<(), ItemError> {
        self.store.delete(id).await?;
        tracing::info!(item_id = %id, "item deleted");
        Ok(())
    }
}
