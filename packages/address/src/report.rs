//! End-of-run diagnostics report.
//!
//! Mismatches are paired with the reference table's value at report time.
//! That is only consistent because [`ZipCodeTable`] cannot change after it
//! is built.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::diagnostics::Diagnostics;
use crate::zipcodes::ZipCodeTable;

/// Observed values for one postcode next to the value the table holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    /// The reference table's value.
    pub expected: Option<String>,
    /// Tagged values that disagreed, sorted.
    pub observed: Vec<String>,
}

/// Size of each report section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportCounts {
    pub unclassified_street_types: usize,
    pub unclassified_street_names: usize,
    pub city_mismatches: usize,
    pub state_mismatches: usize,
    pub unknown_postcodes: usize,
}

/// Serializable summary of a run's [`Diagnostics`].
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsReport {
    pub unclassified_street_types: BTreeMap<String, Vec<String>>,
    pub city_mismatches: BTreeMap<String, Mismatch>,
    pub state_mismatches: BTreeMap<String, Mismatch>,
    pub unknown_postcodes: Vec<String>,
    pub counts: ReportCounts,
}

impl DiagnosticsReport {
    /// Builds the report, reading expected values from `zip_codes`.
    #[must_use]
    pub fn build(diagnostics: &Diagnostics, zip_codes: &ZipCodeTable) -> Self {
        let unclassified_street_types: BTreeMap<String, Vec<String>> = diagnostics
            .unclassified_street_types()
            .iter()
            .map(|(token, names)| (token.clone(), names.iter().cloned().collect()))
            .collect();

        let city_mismatches = pair_with_table(diagnostics.city_mismatches(), |postcode| {
            zip_codes.get(postcode).map(|entry| entry.city.clone())
        });
        let state_mismatches = pair_with_table(diagnostics.state_mismatches(), |postcode| {
            zip_codes.get(postcode).map(|entry| entry.state.clone())
        });

        let counts = ReportCounts {
            unclassified_street_types: unclassified_street_types.len(),
            unclassified_street_names: unclassified_street_types.values().map(Vec::len).sum(),
            city_mismatches: city_mismatches.len(),
            state_mismatches: state_mismatches.len(),
            unknown_postcodes: diagnostics.unknown_postcodes().len(),
        };

        Self {
            unclassified_street_types,
            city_mismatches,
            state_mismatches,
            unknown_postcodes: diagnostics.unknown_postcodes().iter().cloned().collect(),
            counts,
        }
    }

    /// One-line human summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} unclassified street types ({} names), {} postcodes with city mismatches, \
             {} with state mismatches, {} unknown postcodes",
            self.counts.unclassified_street_types,
            self.counts.unclassified_street_names,
            self.counts.city_mismatches,
            self.counts.state_mismatches,
            self.counts.unknown_postcodes,
        )
    }
}

fn pair_with_table(
    observed: &BTreeMap<String, BTreeSet<String>>,
    expected: impl Fn(&str) -> Option<String>,
) -> BTreeMap<String, Mismatch> {
    observed
        .iter()
        .map(|(postcode, values)| {
            (
                postcode.clone(),
                Mismatch {
                    expected: expected(postcode.as_str()),
                    observed: values.iter().cloned().collect(),
                },
            )
        })
        .collect()
}
