//! State name normalization.
//!
//! Upper-cases the value and maps the handful of full state names that
//! appear in the extract to their postal codes. Anything else passes
//! through upper-cased.

use std::collections::BTreeMap;

/// Upper-cased full state name -> two-letter postal code.
#[derive(Debug, Clone, Default)]
pub struct StateNormalizer {
    full_names: BTreeMap<String, String>,
}

impl StateNormalizer {
    /// Keys are upper-cased on the way in so lookups match after the
    /// value itself is upper-cased.
    #[must_use]
    pub fn new(full_names: BTreeMap<String, String>) -> Self {
        Self {
            full_names: full_names
                .into_iter()
                .map(|(name, code)| (name.to_uppercase(), code))
                .collect(),
        }
    }

    /// Normalizes a state value. Empty input comes back empty.
    #[must_use]
    pub fn normalize(&self, state: &str) -> String {
        let upper = state.to_uppercase();
        match self.full_names.get(&upper) {
            Some(code) => code.clone(),
            None => upper,
        }
    }
}
