//! Street suffix canonicalization.
//!
//! A street name is split into a prefix and a trailing suffix token
//! ("Madison " + "Ave."). When the token is a known spelling of a street
//! type, it is replaced with the canonical spelling and the prefix is kept
//! byte-for-byte.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;

use crate::TableError;

/// Splits a street name into `(prefix, suffix token)`.
///
/// The token is the last run of non-whitespace characters that starts at
/// a word boundary, optionally ending in a period.
static STREET_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\b(\S+\.?)$").expect("valid regex"));

/// Splits `street_name` into its prefix and trailing suffix token.
///
/// Returns `None` when the name has no token (empty input, or trailing
/// whitespace after the last word).
#[must_use]
pub fn split_suffix(street_name: &str) -> Option<(&str, &str)> {
    let caps = STREET_TYPE_RE.captures(street_name)?;
    let prefix = caps.get(1).map_or("", |m| m.as_str());
    let token = caps.get(2)?.as_str();
    Some((prefix, token))
}

/// Canonical suffix -> accepted alternative spellings.
///
/// Alternative sets are disjoint across canonical suffixes; construction
/// rejects a spelling claimed by two canonicals.
#[derive(Debug, Clone)]
pub struct SuffixAlternativeTable {
    alternatives: BTreeMap<String, BTreeSet<String>>,
}

impl SuffixAlternativeTable {
    /// Builds the table.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ConflictingSuffix`] if a spelling (canonical
    /// or alternative) maps to more than one canonical suffix.
    pub fn new(alternatives: BTreeMap<String, BTreeSet<String>>) -> Result<Self, TableError> {
        let table = Self { alternatives };
        // Building the index is where conflicts surface.
        table.try_index()?;
        Ok(table)
    }

    /// Canonical suffixes in sorted order.
    pub fn canonical_suffixes(&self) -> impl Iterator<Item = &str> {
        self.alternatives.keys().map(String::as_str)
    }

    /// Flattens the table into a spelling -> canonical lookup.
    #[must_use]
    pub fn index(&self) -> CanonicalSuffixIndex {
        // Conflicts were rejected in `new`, so every insert below agrees.
        let mut map = HashMap::new();
        for (canonical, alternatives) in &self.alternatives {
            map.insert(canonical.clone(), canonical.clone());
            for alternative in alternatives {
                map.insert(alternative.clone(), canonical.clone());
            }
        }
        CanonicalSuffixIndex { map }
    }

    fn try_index(&self) -> Result<(), TableError> {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for (canonical, alternatives) in &self.alternatives {
            let spellings = std::iter::once(canonical).chain(alternatives.iter());
            for spelling in spellings {
                match seen.get(spelling.as_str()) {
                    Some(existing) if *existing != canonical.as_str() => {
                        return Err(TableError::ConflictingSuffix {
                            spelling: spelling.clone(),
                            first: (*existing).to_string(),
                            second: canonical.clone(),
                        });
                    }
                    _ => {
                        seen.insert(spelling.as_str(), canonical.as_str());
                    }
                }
            }
        }
        Ok(())
    }
}

/// Any accepted spelling (canonical or alternative) -> canonical suffix.
#[derive(Debug, Clone, Default)]
pub struct CanonicalSuffixIndex {
    map: HashMap<String, String>,
}

impl CanonicalSuffixIndex {
    /// Looks up the canonical form of a token. Case-sensitive.
    #[must_use]
    pub fn canonical(&self, token: &str) -> Option<&str> {
        self.map.get(token).map(String::as_str)
    }

    /// Number of accepted spellings, canonical ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if no spelling is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Rewrites the trailing suffix token of a street name to its canonical
/// spelling.
#[derive(Debug, Clone)]
pub struct SuffixCanonicalizer {
    index: CanonicalSuffixIndex,
}

impl SuffixCanonicalizer {
    /// Creates a canonicalizer over the flattened suffix index.
    #[must_use]
    pub const fn new(index: CanonicalSuffixIndex) -> Self {
        Self { index }
    }

    /// Returns the name with its suffix token canonicalized, or `None` if
    /// the token is not a known spelling.
    #[must_use]
    pub fn canonicalize(&self, street_name: &str) -> Option<String> {
        let (prefix, token) = split_suffix(street_name)?;
        let canonical = self.index.canonical(token)?;
        Some(format!("{prefix}{canonical}"))
    }
}
