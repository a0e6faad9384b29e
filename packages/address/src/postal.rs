//! Postcode reconciliation.
//!
//! A postcode that resolves in the reference table is treated as ground
//! truth: the address's city and state are overwritten with the table's
//! values. Disagreements are recorded for review before the overwrite.

use std::sync::LazyLock;

use osm_clean_address_models::Address;
use regex::Regex;

use crate::diagnostics::Diagnostics;
use crate::zipcodes::ZipCodeTable;

/// First run of five digits, e.g. "10011" in "NY 10011-1234".
static ZIP_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\D*(\d{5})").expect("valid regex"));

/// Returns the reference-table lookup key for a postcode.
///
/// The input is trimmed, then the first five-digit run is used. Without
/// one, the trimmed string itself is the key (and will simply miss).
#[must_use]
pub fn extract_zip_code(postcode: &str) -> &str {
    let trimmed = postcode.trim();
    ZIP_CODE_RE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map_or(trimmed, |m| m.as_str())
}

/// Checks addresses against the postcode reference table.
#[derive(Debug, Clone, Copy)]
pub struct PostalReconciler<'a> {
    zip_codes: &'a ZipCodeTable,
}

impl<'a> PostalReconciler<'a> {
    /// Creates a reconciler over the reference table.
    #[must_use]
    pub const fn new(zip_codes: &'a ZipCodeTable) -> Self {
        Self { zip_codes }
    }

    /// Reconciles the address's city and state against its postcode.
    ///
    /// Does nothing if the address has no postcode. The postcode field
    /// itself is not rewritten here.
    pub fn reconcile(&self, address: &mut Address, diagnostics: &mut Diagnostics) {
        let Some(postcode) = address.postcode.as_deref() else {
            return;
        };
        let key = extract_zip_code(postcode).to_string();

        let Some(entry) = self.zip_codes.get(&key) else {
            diagnostics.record_unknown_postcode(&key);
            return;
        };

        if let Some(city) = address.city.as_deref()
            && city != entry.city
        {
            diagnostics.record_city_mismatch(&key, city);
        }
        if let Some(state) = address.state.as_deref()
            && state != entry.state
        {
            diagnostics.record_state_mismatch(&key, state);
        }

        address.city = Some(entry.city.clone());
        address.state = Some(entry.state.clone());
    }
}

#[cfg(test)]
mod tests {
    use osm_clean_address_models::ZipCodeEntry;

    use super::*;

    fn table() -> ZipCodeTable {
        ZipCodeTable::from_entries([
            ("10001".to_string(), ZipCodeEntry::new("New York", "NY")),
            ("11201".to_string(), ZipCodeEntry::new("Brooklyn", "NY")),
            ("10004".to_string(), ZipCodeEntry::new("Governors Island", "NJ")),
        ])
    }

    fn address(postcode: &str, city: Option<&str>, state: Option<&str>) -> Address {
        Address {
            postcode: Some(postcode.to_string()),
            city: city.map(str::to_string),
            state: state.map(str::to_string),
            ..Address::default()
        }
    }

    #[test]
    fn extracts_five_digit_key() {
        assert_eq!(extract_zip_code("NY 10011-1234"), "10011");
        assert_eq!(extract_zip_code("10011"), "10011");
        assert_eq!(extract_zip_code(" 10011 "), "10011");
        assert_eq!(extract_zip_code("100111234"), "10011");
    }

    #[test]
    fn falls_back_to_trimmed_input() {
        assert_eq!(extract_zip_code("ABC"), "ABC");
        assert_eq!(extract_zip_code(" 1001 "), "1001");
        assert_eq!(extract_zip_code(""), "");
    }

    #[test]
    fn overwrites_city_and_state_on_hit() {
        let zip_codes = table();
        let mut d = Diagnostics::new();
        let mut a = address("10001", None, None);

        PostalReconciler::new(&zip_codes).reconcile(&mut a, &mut d);

        assert_eq!(a.city.as_deref(), Some("New York"));
        assert_eq!(a.state.as_deref(), Some("NY"));
        assert!(d.is_empty());
    }

    #[test]
    fn records_mismatch_but_still_overwrites() {
        let zip_codes = table();
        let mut d = Diagnostics::new();
        let mut a = address("11201", Some("Brooklyn Heights"), Some("NJ"));

        PostalReconciler::new(&zip_codes).reconcile(&mut a, &mut d);

        assert_eq!(a.city.as_deref(), Some("Brooklyn"));
        assert_eq!(a.state.as_deref(), Some("NY"));
        assert!(d.city_mismatches()["11201"].contains("Brooklyn Heights"));
        assert!(d.state_mismatches()["11201"].contains("NJ"));
    }

    #[test]
    fn keys_mismatches_by_extracted_code() {
        let zip_codes = table();
        let mut d = Diagnostics::new();
        let mut a = address("NY 11201-0001", Some("Kings"), None);

        PostalReconciler::new(&zip_codes).reconcile(&mut a, &mut d);

        assert!(d.city_mismatches().contains_key("11201"));
        assert_eq!(a.postcode.as_deref(), Some("NY 11201-0001"));
    }

    #[test]
    fn override_wins_regardless_of_table() {
        let zip_codes = table();
        let mut d = Diagnostics::new();
        let mut a = address("10004", Some("Jersey City"), Some("NJ"));

        PostalReconciler::new(&zip_codes).reconcile(&mut a, &mut d);

        assert_eq!(a.city.as_deref(), Some("New York"));
        assert_eq!(a.state.as_deref(), Some("NY"));
    }

    #[test]
    fn miss_leaves_city_and_state_alone() {
        let zip_codes = table();
        let mut d = Diagnostics::new();
        let mut a = address("ABC", Some("Hoboken"), Some("NJ"));

        PostalReconciler::new(&zip_codes).reconcile(&mut a, &mut d);

        assert_eq!(a.city.as_deref(), Some("Hoboken"));
        assert_eq!(a.state.as_deref(), Some("NJ"));
        assert!(d.unknown_postcodes().contains("ABC"));
    }

    #[test]
    fn no_postcode_is_a_no_op() {
        let zip_codes = table();
        let mut d = Diagnostics::new();
        let mut a = Address {
            city: Some("Hoboken".to_string()),
            ..Address::default()
        };

        PostalReconciler::new(&zip_codes).reconcile(&mut a, &mut d);

        assert_eq!(a.city.as_deref(), Some("Hoboken"));
        assert!(d.is_empty());
    }
}
