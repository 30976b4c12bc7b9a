use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockbook_core::ItemId;

use crate::mac::MacAddress;

/// Generic auxiliary columns carried by every item.
///
/// Stored and returned as-is; no handler validates or edits them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuxiliaryFields {
    pub text_field: Option<String>,
    pub date_field: Option<DateTime<Utc>>,
    pub boolean_field: Option<bool>,
    pub decimal_field: Option<Decimal>,
}

/// A validated set of editable fields, ready to be persisted.
///
/// Only obtainable through `ItemForm::validate`, so holding one means every
/// field rule already passed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDraft {
    pub(crate) name: String,
    pub(crate) price: f64,
    pub(crate) mac_address: MacAddress,
    pub(crate) serial_number: String,
    pub(crate) manufacturer: String,
    pub(crate) description: Option<String>,
}

impl ItemDraft {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn mac_address(&self) -> &MacAddress {
        &self.mac_address
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Build the stored record for a freshly assigned identifier.
    pub fn into_item(self, id: ItemId, aux: AuxiliaryFields) -> InventoryItem {
        InventoryItem {
            id,
            name: self.name,
            price: self.price,
            mac_address: self.mac_address,
            serial_number: self.serial_number,
            manufacturer: self.manufacturer,
            description: self.description,
            aux,
        }
    }
}

/// Which unique column a proposed item collides on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictField {
    MacAddress,
    SerialNumber,
}

impl ConflictField {
    /// Human-readable message shown next to the form.
    pub fn message(self) -> &'static str {
        match self {
            ConflictField::MacAddress => "MAC address is already in use by another item",
            ConflictField::SerialNumber => "Serial number is already in use by another item",
        }
    }
}

/// A stored inventory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ItemId,
    pub name: String,
    pub price: f64,
    pub mac_address: MacAddress,
    pub serial_number: String,
    pub manufacturer: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub aux: AuxiliaryFields,
}

impl InventoryItem {
    /// Overwrite the editable fields with a validated draft.
    ///
    /// The identifier and the auxiliary fields are left untouched.
    pub fn apply(&mut self, draft: ItemDraft) {
        self.name = draft.name;
        self.price = draft.price;
        self.mac_address = draft.mac_address;
        self.serial_number = draft.serial_number;
        self.manufacturer = draft.manufacturer;
        self.description = draft.description;
    }

    /// Returns the first unique column on which `draft` collides with this item.
    pub fn conflicts_with(&self, draft: &ItemDraft) -> Option<ConflictField> {
        self.clash(&draft.mac_address, &draft.serial_number)
    }

    /// Same check against another stored item.
    pub fn clashes_with(&self, other: &InventoryItem) -> Option<ConflictField> {
        self.clash(&other.mac_address, &other.serial_number)
    }

    fn clash(&self, mac_address: &MacAddress, serial_number: &str) -> Option<ConflictField> {
        if self.mac_address == *mac_address {
            Some(ConflictField::MacAddress)
        } else if self.serial_number == serial_number {
            Some(ConflictField::SerialNumber)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::ItemForm;

    fn draft(mac: &str, serial: &str) -> ItemDraft {
        ItemForm::new("Router", "49.99", mac, serial, "Acme")
            .validate()
            .unwrap()
    }

    #[test]
    fn apply_overwrites_editable_fields_only() {
        let aux = AuxiliaryFields {
            text_field: Some("keep".into()),
            boolean_field: Some(true),
            ..AuxiliaryFields::default()
        };
        let mut item = draft("AA:BB:CC:DD:EE:FF", "SN001").into_item(ItemId::new(7), aux.clone());

        let mut form = ItemForm::new("Switch", "120", "11-22-33-44-55-66", "SN002", "Globex");
        form.description = Some("rack 4".into());
        item.apply(form.validate().unwrap());

        assert_eq!(item.id, ItemId::new(7));
        assert_eq!(item.name, "Switch");
        assert_eq!(item.price, 120.0);
        assert_eq!(item.mac_address.as_str(), "11:22:33:44:55:66");
        assert_eq!(item.serial_number, "SN002");
        assert_eq!(item.manufacturer, "Globex");
        assert_eq!(item.description.as_deref(), Some("rack 4"));
        assert_eq!(item.aux, aux);
    }

    #[test]
    fn conflicts_report_mac_before_serial() {
        let item = draft("AA:BB:CC:DD:EE:FF", "SN001").into_item(ItemId::new(1), AuxiliaryFields::default());

        assert_eq!(item.conflicts_with(&draft("aa:bb:cc:dd:ee:ff", "SN001")), Some(ConflictField::MacAddress));
        assert_eq!(item.conflicts_with(&draft("00:00:00:00:00:01", "SN001")), Some(ConflictField::SerialNumber));
        assert_eq!(item.conflicts_with(&draft("00:00:00:00:00:01", "SN999")), None);
    }

    #[test]
    fn serializes_auxiliary_fields_flat() {
        let item = draft("AA:BB:CC:DD:EE:FF", "SN001").into_item(ItemId::new(3), AuxiliaryFields::default());
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["mac_address"], "AA:BB:CC:DD:EE:FF");
        assert!(json.get("text_field").is_some());
        assert!(json.get("aux").is_none());
    }
}
