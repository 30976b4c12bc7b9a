//! Item persistence abstractions.
//!
//! The store is the only shared mutable resource in the system. Implementations
//! must enforce MAC address and serial number uniqueness themselves; the
//! service-level pre-check is advisory and races with concurrent writers.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use stockbook_core::ItemId;
use stockbook_inventory::{ConflictField, InventoryItem, ItemDraft};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryItemStore;
pub use postgres::PostgresItemStore;

/// Store-level failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A unique column constraint rejected the write.
    #[error("unique constraint violated on {0:?}")]
    Conflict(ConflictField),
    /// The targeted row does not exist.
    #[error("item {0} not found")]
    NotFound(ItemId),
    /// Anything else (connectivity, malformed rows, driver errors).
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Persistence for inventory items.
///
/// Every mutating call is atomic: on error nothing is written.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// All items, in the backend's natural order.
    async fn list(&self) -> Result<Vec<InventoryItem>, StoreError>;

    async fn get(&self, id: ItemId) -> Result<Option<InventoryItem>, StoreError>;

    /// Persist a new item; the store assigns the identifier.
    async fn insert(&self, draft: ItemDraft) -> Result<InventoryItem, StoreError>;

    /// Overwrite the editable fields of an existing item.
    async fn update(&self, item: &InventoryItem) -> Result<(), StoreError>;

    async fn delete(&self, id: ItemId) -> Result<(), StoreError>;

    /// First unique column on which `draft` collides with a stored item,
    /// ignoring the item `exclude` (the one being edited).
    async fn find_conflict(
        &self,
        draft: &ItemDraft,
        exclude: Option<ItemId>,
    ) -> Result<Option<ConflictField>, StoreError>;

    /// Connectivity probe.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Short backend name for diagnostics.
    fn backend(&self) -> &'static str;
}

#[async_trait]
impl<S> ItemStore for Arc<S>
where
    S: ItemStore + ?Sized,
{
    async fn list(&self) -> Result<Vec<InventoryItem>, StoreError> {
        (**self).list().await
    }

    async fn get(&self, id: ItemId) -> Result<Option<InventoryItem>, StoreError> {
        (**self).get(id).await
    }

    async fn insert(&self, draft: ItemDraft) -> Result<InventoryItem, StoreError> {
        (**self).insert(draft).await
    }

    async fn update(&self, item: &InventoryItem) -> Result<(), StoreError> {
        (**self).update(item).await
    }

    async fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        (**self).delete(id).await
    }

    async fn find_conflict(
        &self,
        draft: &ItemDraft,
        exclude: Option<ItemId>,
    ) -> Result<Option<ConflictField>, StoreError> {
        (**self).find_conflict(draft, exclude).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        (**self).ping().await
    }

    fn backend(&self) -> &'static str {
        (**self).backend()
    }
}
