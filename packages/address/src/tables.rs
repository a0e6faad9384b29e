//! Built-in normalization tables.
//!
//! The suffix and state tables live in `data/tables.toml`, which is baked
//! into the binary at compile time via [`include_str!`] and parsed once at
//! startup. The parsed structures are immutable and passed explicitly to
//! whatever needs them.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::TableError;
use crate::state::StateNormalizer;
use crate::suffix::SuffixAlternativeTable;

/// TOML embedded at compile time.
const BUILTIN_TABLES: &str = include_str!("../data/tables.toml");

/// Raw shape of the tables document.
#[derive(Debug, Deserialize)]
struct TablesDocument {
    suffixes: BTreeMap<String, BTreeSet<String>>,
    #[serde(default)]
    states: BTreeMap<String, String>,
}

/// The parsed suffix and state tables.
#[derive(Debug, Clone)]
pub struct AddressTables {
    pub suffixes: SuffixAlternativeTable,
    pub states: StateNormalizer,
}

impl AddressTables {
    /// Parses the tables compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded document is invalid TOML or its
    /// suffix table maps a spelling to two canonical suffixes.
    pub fn builtin() -> Result<Self, TableError> {
        Self::from_toml_str(BUILTIN_TABLES)
    }

    /// Parses a tables document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is invalid TOML, a state code is
    /// not two letters, or the suffix table maps a spelling to two
    /// canonical suffixes.
    pub fn from_toml_str(source: &str) -> Result<Self, TableError> {
        let document: TablesDocument = toml::from_str(source)?;

        for (name, code) in &document.states {
            if code.len() != 2 || !code.chars().all(|c| c.is_ascii_uppercase()) {
                return Err(TableError::InvalidStateCode {
                    name: name.clone(),
                    code: code.clone(),
                });
            }
        }

        let suffixes = SuffixAlternativeTable::new(document.suffixes)?;
        log::debug!(
            "Loaded {} canonical street suffixes and {} state names",
            suffixes.canonical_suffixes().count(),
            document.states.len()
        );

        Ok(Self {
            suffixes,
            states: StateNormalizer::new(document.states),
        })
    }
}
