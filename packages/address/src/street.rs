//! Street name cleaning.
//!
//! Runs the matchers in order and falls back to recording the name as
//! unclassified when none of them recognizes it.

use crate::diagnostics::Diagnostics;
use crate::matchers::StreetNameMatcher;
use crate::suffix::{CanonicalSuffixIndex, SuffixCanonicalizer, split_suffix};

/// Ordered list of matchers applied to every street name.
#[derive(Debug, Clone)]
pub struct StreetNameCleaner {
    matchers: Vec<StreetNameMatcher>,
}

impl StreetNameCleaner {
    /// Naming-convention matchers first, suffix canonicalization last.
    #[must_use]
    pub fn new(index: CanonicalSuffixIndex) -> Self {
        Self::with_matchers(vec![
            StreetNameMatcher::AvenueLetter,
            StreetNameMatcher::CanonicalSuffix(SuffixCanonicalizer::new(index)),
        ])
    }

    /// Uses the given matchers, tried in order.
    #[must_use]
    pub const fn with_matchers(matchers: Vec<StreetNameMatcher>) -> Self {
        Self { matchers }
    }

    /// Returns the first matcher's result. If no matcher handles the name,
    /// records it under its suffix token and returns it unchanged.
    pub fn clean(&self, street_name: &str, diagnostics: &mut Diagnostics) -> String {
        for matcher in &self.matchers {
            if let Some(cleaned) = matcher.clean(street_name) {
                log::debug!("[{street_name}] => [{cleaned}] ({})", matcher.name());
                return cleaned;
            }
        }

        if let Some((_, token)) = split_suffix(street_name) {
            diagnostics.record_unclassified_street(token, street_name);
        }

        street_name.to_string()
    }
}
