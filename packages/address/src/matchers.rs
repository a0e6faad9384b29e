//! Street name matchers.
//!
//! Each matcher either recognizes a street name and returns its cleaned
//! form, or declines with `None`. The set is closed: adding a naming idiom
//! means adding a variant here.

use std::sync::LazyLock;

use regex::Regex;

use crate::suffix::SuffixCanonicalizer;

/// `Avenue` followed by a single letter, e.g. "Avenue X" in Brooklyn.
static AVENUE_LETTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Avenue ([A-Z])$").expect("valid regex"));

/// A recognizer for one street naming convention.
#[derive(Debug, Clone)]
pub enum StreetNameMatcher {
    /// Letter avenues. Must run before [`Self::CanonicalSuffix`] so the
    /// letter is never read as a one-character suffix.
    AvenueLetter,
    /// Generic suffix canonicalization.
    CanonicalSuffix(SuffixCanonicalizer),
}

impl StreetNameMatcher {
    /// Returns the cleaned street name, or `None` if this matcher does not
    /// handle it.
    #[must_use]
    pub fn clean(&self, street_name: &str) -> Option<String> {
        match self {
            Self::AvenueLetter => clean_avenue_letter(street_name),
            Self::CanonicalSuffix(canonicalizer) => canonicalizer.canonicalize(street_name),
        }
    }

    /// Short label used in log output.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AvenueLetter => "avenue-letter",
            Self::CanonicalSuffix(_) => "canonical-suffix",
        }
    }
}

/// "avenue x" -> "Avenue x". The letter's case is kept as written.
fn clean_avenue_letter(street_name: &str) -> Option<String> {
    let caps = AVENUE_LETTER_RE.captures(street_name)?;
    let letter = caps.get(1)?.as_str();
    Some(format!("Avenue {letter}"))
}
