//! Per-record address processing.
//!
//! Applies street cleaning, state normalization, and postcode
//! reconciliation, in that order, to one record's address. State runs
//! before postcode so mismatch diagnostics compare normalized states.

use osm_clean_address_models::{Address, Element};

use crate::diagnostics::Diagnostics;
use crate::postal::PostalReconciler;
use crate::state::StateNormalizer;
use crate::street::StreetNameCleaner;
use crate::tables::AddressTables;
use crate::zipcodes::ZipCodeTable;

/// Everything needed to clean an address, built once per run.
#[derive(Debug, Clone)]
pub struct AddressProcessor {
    streets: StreetNameCleaner,
    states: StateNormalizer,
    zip_codes: ZipCodeTable,
}

impl AddressProcessor {
    /// Builds the street cleaner and state normalizer from the tables.
    #[must_use]
    pub fn new(tables: AddressTables, zip_codes: ZipCodeTable) -> Self {
        Self {
            streets: StreetNameCleaner::new(tables.suffixes.index()),
            states: tables.states,
            zip_codes,
        }
    }

    /// The reference table, for building the end-of-run report.
    #[must_use]
    pub const fn zip_codes(&self) -> &ZipCodeTable {
        &self.zip_codes
    }

    /// Cleans an address in place. Each step is skipped when its input
    /// field is absent; an absent address is a no-op.
    pub fn process(&self, address: Option<&mut Address>, diagnostics: &mut Diagnostics) {
        let Some(address) = address else {
            return;
        };

        if let Some(street) = address.street.as_deref() {
            address.street = Some(self.streets.clean(street, diagnostics));
        }

        if let Some(state) = address.state.as_deref() {
            address.state = Some(self.states.normalize(state));
        }

        if let Some(postcode) = address.postcode.as_mut() {
            *postcode = postcode.trim().to_string();
            PostalReconciler::new(&self.zip_codes).reconcile(address, diagnostics);
        }
    }

    /// Cleans the address of a shaped element, if it has one.
    pub fn process_element(&self, element: &mut Element, diagnostics: &mut Diagnostics) {
        self.process(element.address.as_mut(), diagnostics);
    }
}

#[cfg(test)]
mod tests {
    use osm_clean_address_models::{ElementKind, ZipCodeEntry};

    use super::*;

    fn processor() -> AddressProcessor {
        let zip_codes = ZipCodeTable::from_entries([
            ("10118".to_string(), ZipCodeEntry::new("New York", "NY")),
            ("11235".to_string(), ZipCodeEntry::new("Brooklyn", "NY")),
        ]);
        AddressProcessor::new(AddressTables::builtin().unwrap(), zip_codes)
    }

    #[test]
    fn cleans_empire_state_building() {
        let mut address = Address {
            street: Some("350 5th Ave.".to_string()),
            state: Some("new york".to_string()),
            postcode: Some(" 10118 ".to_string()),
            ..Address::default()
        };
        let mut d = Diagnostics::new();

        processor().process(Some(&mut address), &mut d);

        assert_eq!(address.street.as_deref(), Some("350 5th Avenue"));
        assert_eq!(address.state.as_deref(), Some("NY"));
        assert_eq!(address.postcode.as_deref(), Some("10118"));
        assert_eq!(address.city.as_deref(), Some("New York"));
        assert!(d.is_empty());
    }

    #[test]
    fn compares_normalized_state_against_table() {
        let mut address = Address {
            state: Some("New York".to_string()),
            postcode: Some("11235".to_string()),
            ..Address::default()
        };
        let mut d = Diagnostics::new();

        processor().process(Some(&mut address), &mut d);

        assert!(d.state_mismatches().is_empty());
        assert_eq!(address.city.as_deref(), Some("Brooklyn"));
    }

    #[test]
    fn collects_diagnostics_across_records() {
        let p = processor();
        let mut d = Diagnostics::new();

        let mut first = Address {
            street: Some("Jericho Pike".to_string()),
            postcode: Some("99999".to_string()),
            ..Address::default()
        };
        let mut second = Address {
            street: Some("Old Country Pike".to_string()),
            city: Some("Coney Island".to_string()),
            postcode: Some("11235".to_string()),
            ..Address::default()
        };
        p.process(Some(&mut first), &mut d);
        p.process(Some(&mut second), &mut d);

        assert_eq!(d.unclassified_street_types()["Pike"].len(), 2);
        assert!(d.unknown_postcodes().contains("99999"));
        assert!(d.city_mismatches()["11235"].contains("Coney Island"));
        assert_eq!(first.street.as_deref(), Some("Jericho Pike"));
        assert_eq!(second.city.as_deref(), Some("Brooklyn"));
    }

    #[test]
    fn letter_avenue_survives_processing() {
        let mut address = Address {
            street: Some("AVENUE U".to_string()),
            ..Address::default()
        };
        let mut d = Diagnostics::new();

        processor().process(Some(&mut address), &mut d);

        assert_eq!(address.street.as_deref(), Some("Avenue U"));
        assert!(d.is_empty());
    }

    #[test]
    fn leaves_other_fields_untouched() {
        let mut address = Address {
            city: Some("hoboken".to_string()),
            ..Address::default()
        };
        address.set("housenumber", "12".to_string());
        let before = address.clone();
        let mut d = Diagnostics::new();

        processor().process(Some(&mut address), &mut d);

        assert_eq!(address, before);
        assert!(d.is_empty());
    }

    #[test]
    fn absent_address_is_a_no_op() {
        let mut d = Diagnostics::new();
        processor().process(None, &mut d);
        assert!(d.is_empty());
    }

    #[test]
    fn processes_element_address() {
        let mut element = Element::new("1", ElementKind::Node);
        element.address = Some(Address {
            street: Some("Ocean Pkwy".to_string()),
            ..Address::default()
        });
        let mut d = Diagnostics::new();

        processor().process_element(&mut element, &mut d);

        let street = element.address.and_then(|a| a.street);
        assert_eq!(street.as_deref(), Some("Ocean Parkway"));
    }
}
