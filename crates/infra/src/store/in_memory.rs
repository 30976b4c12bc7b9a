use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use stockbook_core::ItemId;
use stockbook_inventory::{AuxiliaryFields, ConflictField, InventoryItem, ItemDraft};

use super::{ItemStore, StoreError};

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<ItemId, InventoryItem>,
}

impl Table {
    fn conflict(&self, draft: &ItemDraft, exclude: Option<ItemId>) -> Option<ConflictField> {
        self.rows
            .values()
            .filter(|item| Some(item.id) != exclude)
            .find_map(|item| item.conflicts_with(draft))
    }
}

/// In-memory item store for tests/dev.
///
/// Identifiers are assigned sequentially from 1 and never reused, matching an
/// auto-increment column. Unique constraints are checked under the write lock,
/// so they hold even when callers skip the pre-check.
#[derive(Debug, Default)]
pub struct InMemoryItemStore {
    inner: RwLock<Table>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn list(&self) -> Result<Vec<InventoryItem>, StoreError> {
        let table = self.inner.read().map_err(|_| poisoned())?;
        Ok(table.rows.values().cloned().collect())
    }

    async fn get(&self, id: ItemId) -> Result<Option<InventoryItem>, StoreError> {
        let table = self.inner.read().map_err(|_| poisoned())?;
        Ok(table.rows.get(&id).cloned())
    }

    async fn insert(&self, draft: ItemDraft) -> Result<InventoryItem, StoreError> {
        let mut table = self.inner.write().map_err(|_| poisoned())?;
        if let Some(field) = table.conflict(&draft, None) {
            return Err(StoreError::Conflict(field));
        }

        table.last_id += 1;
        let item = draft.into_item(ItemId::new(table.last_id), AuxiliaryFields::default());
        table.rows.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update(&self, item: &InventoryItem) -> Result<(), StoreError> {
        let mut table = self.inner.write().map_err(|_| poisoned())?;
        let Some(existing) = table.rows.get(&item.id) else {
            return Err(StoreError::NotFound(item.id));
        };

        let mut updated = existing.clone();
        updated.name = item.name.clone();
        updated.price = item.price;
        updated.mac_address = item.mac_address.clone();
        updated.serial_number = item.serial_number.clone();
        updated.manufacturer = item.manufacturer.clone();
        updated.description = item.description.clone();

        let clash = table
            .rows
            .values()
            .filter(|other| other.id != item.id)
            .find_map(|other| other.clashes_with(&updated));
        if let Some(field) = clash {
            return Err(StoreError::Conflict(field));
        }

        table.rows.insert(item.id, updated);
        Ok(())
    }

    async fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        let mut table = self.inner.write().map_err(|_| poisoned())?;
        match table.rows.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn find_conflict(
        &self,
        draft: &ItemDraft,
        exclude: Option<ItemId>,
    ) -> Result<Option<ConflictField>, StoreError> {
        let table = self.inner.read().map_err(|_| poisoned())?;
        Ok(table.conflict(draft, exclude))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.read().map(|_| ()).map_err(|_| poisoned())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
