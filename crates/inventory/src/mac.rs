//! MAC address value object.

use serde::{Deserialize, Serialize};

use stockbook_core::DomainError;

const GROUPS: usize = 6;
const TEXT_LEN: usize = GROUPS * 2 + (GROUPS - 1);

/// Returns true iff `s` is six pairs of hex digits separated uniformly by `:`
/// or by `-`, with nothing before or after.
pub fn is_valid_mac(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != TEXT_LEN {
        return false;
    }

    let sep = bytes[2];
    if sep != b':' && sep != b'-' {
        return false;
    }

    bytes.chunks(3).all(|chunk| match chunk {
        [hi, lo, s] => hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() && *s == sep,
        [hi, lo] => hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit(),
        _ => false,
    })
}

/// A validated MAC address in canonical form.
///
/// Hex digits are upper-cased and groups are joined with `:`, so the
/// hyphenated and lower-case spellings of one hardware address are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress(String);

impl MacAddress {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if !is_valid_mac(trimmed) {
            return Err(DomainError::validation(format!("malformed MAC address: {trimmed:?}")));
        }
        Ok(Self(trimmed.to_ascii_uppercase().replace('-', ":")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for MacAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for MacAddress {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MacAddress> for String {
    fn from(value: MacAddress) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_colon_and_hyphen_forms() {
        assert!(is_valid_mac("AA:BB:CC:DD:EE:FF"));
        assert!(is_valid_mac("aa-bb-cc-dd-ee-ff"));
        assert!(is_valid_mac("00:1a:2B:3c:4D:5e"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_mac(""));
        assert!(!is_valid_mac("AA:BB:CC:DD:EE"));
        assert!(!is_valid_mac("AA:BB:CC:DD:EE:FF:00"));
        assert!(!is_valid_mac("AA:BB:CC:DD:EE:FG"));
        assert!(!is_valid_mac("AA:BB-CC:DD:EE:FF"));
        assert!(!is_valid_mac("AABB.CCDD.EEFF"));
        assert!(!is_valid_mac(" AA:BB:CC:DD:EE:FF"));
        assert!(!is_valid_mac("AA:BB:CC:DD:EE:FF "));
        assert!(!is_valid_mac("AA::BB:CC:DD:EE:F"));
        assert!(!is_valid_mac("ÄA:BB:CC:DD:EE:F"));
    }

    #[test]
    fn parse_trims_and_upper_cases() {
        let mac = MacAddress::parse("  aa:bb:cc:dd:ee:ff ").unwrap();
        assert_eq!(mac.as_str(), "AA:BB:CC:DD:EE:FF");
        assert_eq!(mac, MacAddress::parse("AA:BB:CC:DD:EE:FF").unwrap());
    }

    #[test]
    fn parse_joins_groups_with_colons() {
        let mac = MacAddress::parse("0a-0b-0c-0d-0e-0f").unwrap();
        assert_eq!(mac.as_str(), "0A:0B:0C:0D:0E:0F");
        assert_eq!(mac, MacAddress::parse("0A:0B:0C:0D:0E:0F").unwrap());
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn join(pairs: &[String], sep: char) -> String {
            pairs.join(&sep.to_string())
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: any six hex pairs with one uniform separator are valid.
            #[test]
            fn uniform_hex_pairs_are_valid(
                pairs in proptest::collection::vec("[0-9a-fA-F]{2}", 6),
                colon in any::<bool>(),
            ) {
                let sep = if colon { ':' } else { '-' };
                prop_assert!(is_valid_mac(&join(&pairs, sep)));
            }

            /// Property: both spellings of one address parse to the same value.
            #[test]
            fn separator_does_not_change_identity(
                pairs in proptest::collection::vec("[0-9a-fA-F]{2}", 6),
            ) {
                let colon = MacAddress::parse(&join(&pairs, ':')).unwrap();
                let hyphen = MacAddress::parse(&join(&pairs, '-')).unwrap();
                prop_assert_eq!(colon, hyphen);
            }

            /// Property: the wrong number of pairs is never valid.
            #[test]
            fn wrong_pair_count_is_invalid(
                pairs in proptest::collection::vec("[0-9a-fA-F]{2}", 0..12usize),
            ) {
                prop_assume!(pairs.len() != 6);
                prop_assert!(!is_valid_mac(&join(&pairs, ':')));
            }

            /// Property: mixing the two separators is never valid.
            #[test]
            fn mixed_separators_are_invalid(
                pairs in proptest::collection::vec("[0-9a-fA-F]{2}", 6),
                odd_one in 0..5usize,
            ) {
                let mut s = String::new();
                for (i, pair) in pairs.iter().enumerate() {
                    if i > 0 {
                        s.push(if i - 1 == odd_one { '-' } else { ':' });
                    }
                    s.push_str(pair);
                }
                prop_assert!(!is_valid_mac(&s));
            }

            /// Property: a non-hex character anywhere in a pair invalidates the address.
            #[test]
            fn non_hex_digit_is_invalid(
                pairs in proptest::collection::vec("[0-9a-fA-F]{2}", 6),
                slot in 0..6usize,
                bad in "[g-zG-Z]",
            ) {
                let mut pairs = pairs;
                pairs[slot].replace_range(0..1, &bad);
                prop_assert!(!is_valid_mac(&join(&pairs, ':')));
            }

            /// Property: extra leading or trailing characters invalidate the address.
            #[test]
            fn surrounding_characters_are_invalid(
                pairs in proptest::collection::vec("[0-9a-fA-F]{2}", 6),
                extra in "[ -~]{1,3}",
                leading in any::<bool>(),
            ) {
                let mac = join(&pairs, ':');
                let s = if leading { format!("{extra}{mac}") } else { format!("{mac}{extra}") };
                prop_assert!(!is_valid_mac(&s));
            }
        }
    }
}
