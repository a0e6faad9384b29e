//! Cross-record diagnostic accumulators.
//!
//! Filled while records are processed and read once at the end of the
//! run. Nothing in here feeds back into how a record is cleaned.

use std::collections::{BTreeMap, BTreeSet};

/// Unresolved or inconsistent address data collected across a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Unrecognized suffix token -> street names that end with it.
    unclassified_street_types: BTreeMap<String, BTreeSet<String>>,
    /// Postcode -> tagged cities that disagree with the reference table.
    city_mismatches: BTreeMap<String, BTreeSet<String>>,
    /// Postcode -> tagged states that disagree with the reference table.
    state_mismatches: BTreeMap<String, BTreeSet<String>>,
    /// Postcodes missing from the reference table.
    unknown_postcodes: BTreeSet<String>,
}

impl Diagnostics {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a street name whose suffix token no matcher recognized.
    pub fn record_unclassified_street(&mut self, token: &str, street_name: &str) {
        self.unclassified_street_types
            .entry(token.to_string())
            .or_default()
            .insert(street_name.to_string());
    }

    /// Records a tagged city that disagrees with the table for `postcode`.
    pub fn record_city_mismatch(&mut self, postcode: &str, city: &str) {
        self.city_mismatches
            .entry(postcode.to_string())
            .or_default()
            .insert(city.to_string());
    }

    /// Records a tagged state that disagrees with the table for `postcode`.
    pub fn record_state_mismatch(&mut self, postcode: &str, state: &str) {
        self.state_mismatches
            .entry(postcode.to_string())
            .or_default()
            .insert(state.to_string());
    }

    /// Records a postcode key missing from the reference table.
    pub fn record_unknown_postcode(&mut self, postcode: &str) {
        self.unknown_postcodes.insert(postcode.to_string());
    }

    /// Suffix token -> street names.
    #[must_use]
    pub const fn unclassified_street_types(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.unclassified_street_types
    }

    /// Postcode -> disagreeing cities.
    #[must_use]
    pub const fn city_mismatches(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.city_mismatches
    }

    /// Postcode -> disagreeing states.
    #[must_use]
    pub const fn state_mismatches(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.state_mismatches
    }

    /// Postcode keys with no table entry.
    #[must_use]
    pub const fn unknown_postcodes(&self) -> &BTreeSet<String> {
        &self.unknown_postcodes
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unclassified_street_types.is_empty()
            && self.city_mismatches.is_empty()
            && self.state_mismatches.is_empty()
            && self.unknown_postcodes.is_empty()
    }
}
