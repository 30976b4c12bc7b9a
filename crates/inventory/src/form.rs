//! Raw form submissions and the field rules applied to them.

use serde::{Deserialize, Serialize};

use crate::item::{InventoryItem, ItemDraft};
use crate::mac::{is_valid_mac, MacAddress};

pub const NAME_MAX_CHARS: usize = 100;
pub const SERIAL_MAX_CHARS: usize = 50;

/// Fields exactly as submitted; any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemForm {
    pub name: Option<String>,
    pub price: Option<String>,
    pub mac_address: Option<String>,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub description: Option<String>,
}

impl ItemForm {
    /// Form with every required field filled in and no description.
    pub fn new(
        name: impl Into<String>,
        price: impl Into<String>,
        mac_address: impl Into<String>,
        serial_number: impl Into<String>,
        manufacturer: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            price: Some(price.into()),
            mac_address: Some(mac_address.into()),
            serial_number: Some(serial_number.into()),
            manufacturer: Some(manufacturer.into()),
            description: None,
        }
    }

    /// Prefill a form from a stored item (edit page).
    pub fn from_item(item: &InventoryItem) -> Self {
        Self {
            name: Some(item.name.clone()),
            price: Some(item.price.to_string()),
            mac_address: Some(item.mac_address.to_string()),
            serial_number: Some(item.serial_number.clone()),
            manufacturer: Some(item.manufacturer.clone()),
            description: item.description.clone(),
        }
    }

    /// Check every field rule and, if all pass, produce a typed draft.
    ///
    /// On failure returns every message `validate_fields` reports.
    pub fn validate(&self) -> Result<ItemDraft, Vec<String>> {
        let errors = validate_fields(self);
        if !errors.is_empty() {
            return Err(errors);
        }

        // All rules passed, so each parse below succeeds.
        let mac_address = MacAddress::parse(trimmed(&self.mac_address).unwrap_or_default())
            .map_err(|e| vec![e.to_string()])?;
        let price = trimmed(&self.price)
            .and_then(parse_price)
            .ok_or_else(|| vec![PRICE_NOT_A_NUMBER.to_string()])?;

        Ok(ItemDraft {
            name: owned(&self.name),
            price,
            mac_address,
            serial_number: owned(&self.serial_number),
            manufacturer: owned(&self.manufacturer),
            description: trimmed(&self.description).map(str::to_string),
        })
    }
}

const PRICE_NOT_A_NUMBER: &str = "Price must be a number";

/// Check a submission against the field rules.
///
/// Every rule runs; the returned messages follow field order. An empty vec
/// means the submission is valid. Uniqueness is not checked here.
pub fn validate_fields(form: &ItemForm) -> Vec<String> {
    let mut errors = Vec::new();

    match trimmed(&form.name) {
        None => errors.push("Name is required".to_string()),
        Some(name) if name.chars().count() > NAME_MAX_CHARS => {
            errors.push(format!("Name must be at most {NAME_MAX_CHARS} characters"))
        }
        Some(_) => {}
    }

    match trimmed(&form.price) {
        None => errors.push("Price is required".to_string()),
        Some(raw) => match parse_price(raw) {
            None => errors.push(PRICE_NOT_A_NUMBER.to_string()),
            Some(price) if price <= 0.0 => errors.push("Price must be greater than zero".to_string()),
            Some(_) => {}
        },
    }

    match trimmed(&form.mac_address) {
        None => errors.push("MAC address is required".to_string()),
        Some(mac) if !is_valid_mac(mac) => errors.push(
            "MAC address must be six pairs of hex digits separated by ':' or '-' (e.g. AA:BB:CC:DD:EE:FF)"
                .to_string(),
        ),
        Some(_) => {}
    }

    match trimmed(&form.serial_number) {
        None => errors.push("Serial number is required".to_string()),
        Some(serial) if serial.chars().count() > SERIAL_MAX_CHARS => {
            errors.push(format!("Serial number must be at most {SERIAL_MAX_CHARS} characters"))
        }
        Some(_) => {}
    }

    if trimmed(&form.manufacturer).is_none() {
        errors.push("Manufacturer is required".to_string());
    }

    errors
}

/// Trimmed value, or `None` when missing or blank.
fn trimmed(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn owned(field: &Option<String>) -> String {
    trimmed(field).unwrap_or_default().to_string()
}

/// Parse a finite real number; `NaN` and infinities are not prices.
fn parse_price(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|p| p.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ItemForm {
        ItemForm::new("Router", "49.99", "AA:BB:CC:DD:EE:FF", "SN001", "Acme")
    }

    #[test]
    fn valid_submission_has_no_errors() {
        assert!(validate_fields(&valid()).is_empty());
    }

    #[test]
    fn empty_submission_reports_every_required_field_in_order() {
        let errors = validate_fields(&ItemForm::default());
        assert_eq!(
            errors,
            vec![
                "Name is required",
                "Price is required",
                "MAC address is required",
                "Serial number is required",
                "Manufacturer is required",
            ]
        );
    }

    #[test]
    fn blank_values_count_as_missing() {
        let form = ItemForm::new("   ", "", "\t", " ", "  ");
        assert_eq!(validate_fields(&form).len(), 5);
    }

    #[test]
    fn all_rule_violations_are_collected() {
        let form = ItemForm::new("x".repeat(101), "-5", "not-a-mac", "S".repeat(51), "Acme");
        let errors = validate_fields(&form);
        assert_eq!(errors.len(), 4);
        assert!(errors[0].starts_with("Name must be at most"));
        assert_eq!(errors[1], "Price must be greater than zero");
        assert!(errors[2].starts_with("MAC address must be"));
        assert!(errors[3].starts_with("Serial number must be at most"));
    }

    #[test]
    fn length_limits_are_inclusive() {
        let form = ItemForm::new("n".repeat(100), "1", "AA:BB:CC:DD:EE:FF", "s".repeat(50), "Acme");
        assert!(validate_fields(&form).is_empty());
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let form = ItemForm::new("é".repeat(100), "1", "AA:BB:CC:DD:EE:FF", "ü".repeat(50), "Acme");
        assert!(validate_fields(&form).is_empty());
    }

    #[test]
    fn price_rules() {
        for bad in ["0", "0.0", "-0.01", "-5", "abc", "1,5", "NaN", "inf"] {
            let mut form = valid();
            form.price = Some(bad.to_string());
            assert_eq!(validate_fields(&form).len(), 1, "price {bad:?} should fail");
        }
        for good in ["0.01", "49.99", " 7 ", "1e3"] {
            let mut form = valid();
            form.price = Some(good.to_string());
            assert!(validate_fields(&form).is_empty(), "price {good:?} should pass");
        }
    }

    #[test]
    fn mac_is_trimmed_before_checking() {
        let mut form = valid();
        form.mac_address = Some("  aa-bb-cc-dd-ee-ff  ".to_string());
        assert!(validate_fields(&form).is_empty());
    }

    #[test]
    fn validate_produces_trimmed_typed_draft() {
        let mut form = ItemForm::new(" Router ", "49.99", "aa:bb:cc:dd:ee:ff", " SN001 ", " Acme ");
        form.description = Some("   ".to_string());

        let draft = form.validate().unwrap();
        assert_eq!(draft.name(), "Router");
        assert_eq!(draft.price(), 49.99);
        assert_eq!(draft.mac_address().as_str(), "AA:BB:CC:DD:EE:FF");
        assert_eq!(draft.serial_number(), "SN001");
        assert_eq!(draft.manufacturer(), "Acme");
        assert_eq!(draft.description(), None);
    }

    #[test]
    fn validate_returns_messages_on_failure() {
        let mut form = valid();
        form.manufacturer = None;
        assert_eq!(form.validate().unwrap_err(), vec!["Manufacturer is required"]);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: any parseable price above zero passes the price rule.
            #[test]
            fn positive_prices_pass(price in 0.0001f64..1.0e9) {
                let mut form = valid();
                form.price = Some(price.to_string());
                prop_assert!(validate_fields(&form).is_empty());
            }

            /// Property: zero and negative prices always fail.
            #[test]
            fn non_positive_prices_fail(price in -1.0e9f64..=0.0) {
                let mut form = valid();
                form.price = Some(price.to_string());
                prop_assert_eq!(validate_fields(&form), vec!["Price must be greater than zero".to_string()]);
            }

            /// Property: dropping any one required field yields exactly one message.
            #[test]
            fn missing_required_field_is_reported(which in 0..5usize) {
                let mut form = valid();
                match which {
                    0 => form.name = None,
                    1 => form.price = None,
                    2 => form.mac_address = None,
                    3 => form.serial_number = None,
                    _ => form.manufacturer = None,
                }
                let errors = validate_fields(&form);
                prop_assert_eq!(errors.len(), 1);
                prop_assert!(errors[0].ends_with("is required"));
            }
        }
    }
}
