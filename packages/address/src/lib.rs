#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Address normalization and reconciliation for OSM extracts.
//!
//! Cleans the `addr:*` data of shaped OSM elements one record at a time:
//!
//! - **Street names**: letter avenues ("avenue x" → "Avenue x") are
//!   recognized first, then the trailing suffix token is canonicalized
//!   ("Madison Ave." → "Madison Avenue"). Unrecognized suffixes are
//!   passed through and collected for review.
//! - **States**: upper-cased, with a few full names mapped to postal codes.
//! - **Postcodes**: trimmed and looked up in a reference table; a hit
//!   overwrites city and state, a miss is collected for review.
//!
//! All of it is non-fatal. Anything that cannot be resolved ends up in a
//! [`Diagnostics`] accumulator owned by the caller.
//!
//! # Usage
//!
//! ```rust,no_run
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use osm_clean_address::{
//!     AddressProcessor, AddressTables, Diagnostics, Element, ElementKind, ZipCodeTable,
//! };
//!
//! let zip_codes = ZipCodeTable::from_path("zip_codes_states.csv".as_ref())?;
//! let processor = AddressProcessor::new(AddressTables::builtin()?, zip_codes);
//! let mut diagnostics = Diagnostics::new();
//! let mut element = Element::new("1", ElementKind::Node);
//! processor.process_element(&mut element, &mut diagnostics);
//! # Ok(())
//! # }
//! ```

pub mod diagnostics;
pub mod matchers;
pub mod postal;
pub mod processor;
pub mod report;
pub mod state;
pub mod street;
pub mod suffix;
pub mod tables;
pub mod zipcodes;

pub use diagnostics::Diagnostics;
pub use matchers::StreetNameMatcher;
pub use osm_clean_address_models::{Address, Element, ElementKind, ZipCodeEntry};
pub use postal::{PostalReconciler, extract_zip_code};
pub use processor::AddressProcessor;
pub use report::{DiagnosticsReport, Mismatch, ReportCounts};
pub use state::StateNormalizer;
pub use street::StreetNameCleaner;
pub use suffix::{CanonicalSuffixIndex, SuffixAlternativeTable, SuffixCanonicalizer, split_suffix};
pub use tables::AddressTables;
pub use zipcodes::{ZipCodeError, ZipCodeTable};

/// Errors from building the normalization tables.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The tables document is not valid TOML.
    #[error("Invalid tables document: {0}")]
    Toml(#[from] toml::de::Error),

    /// A spelling is claimed by two canonical suffixes.
    #[error("Suffix spelling `{spelling}` maps to both `{first}` and `{second}`")]
    ConflictingSuffix {
        /// The shared spelling.
        spelling: String,
        /// Canonical suffix that claimed it first.
        first: String,
        /// Canonical suffix that claimed it second.
        second: String,
    },

    /// A state maps to something other than a two-letter code.
    #[error("State `{name}` maps to `{code}`, expected a two-letter code")]
    InvalidStateCode {
        /// Full state name.
        name: String,
        /// The offending code.
        code: String,
    },
}
