//! Inventory domain module.
//!
//! This crate contains the inventory item model and its validation rules,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod form;
pub mod item;
pub mod mac;

pub use form::{validate_fields, ItemForm};
pub use item::{AuxiliaryFields, ConflictField, InventoryItem, ItemDraft};
pub use mac::{is_valid_mac, MacAddress};
