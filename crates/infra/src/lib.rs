//! Infrastructure layer: item persistence, database bootstrap and the item use cases.

pub mod db;
pub mod item_service;
pub mod store;

pub use item_service::{ItemError, ItemService, Listing};
pub use store::{InMemoryItemStore, ItemStore, PostgresItemStore, StoreError};
