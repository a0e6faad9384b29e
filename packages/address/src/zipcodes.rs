//! Postcode reference table.
//!
//! Loaded once from a CSV file with `zip_code`, `city`, and `state`
//! columns (any other columns are ignored). A small set of hand-authored
//! overrides is applied on top of whatever the file says.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use osm_clean_address_models::ZipCodeEntry;
use serde::Deserialize;

/// Entries the reference dataset gets wrong: `(postcode, city, state)`.
pub const OVERRIDES: &[(&str, &str, &str)] = &[("10004", "New York", "NY")];

const REQUIRED_COLUMNS: &[&str] = &["zip_code", "city", "state"];

/// A raw row from the reference CSV.
#[derive(Debug, Deserialize)]
struct ZipCodeRecord {
    zip_code: String,
    city: String,
    state: String,
}

/// Postcode -> authoritative `(city, state)`.
///
/// There are no mutating methods; once built, the table is read-only.
#[derive(Debug, Clone)]
pub struct ZipCodeTable {
    entries: HashMap<String, ZipCodeEntry>,
}

impl ZipCodeTable {
    /// Builds a table from `(postcode, entry)` pairs, then applies
    /// [`OVERRIDES`].
    pub fn from_entries(entries: impl IntoIterator<Item = (String, ZipCodeEntry)>) -> Self {
        let mut table = Self {
            entries: entries.into_iter().collect(),
        };
        table.apply_overrides();
        table
    }

    /// Reads the reference CSV at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, cannot be read, or
    /// lacks one of the required columns.
    pub fn from_path(path: &Path) -> Result<Self, ZipCodeError> {
        if !path.exists() {
            return Err(ZipCodeError::FileNotFound(path.display().to_string()));
        }

        log::info!("Loading postcode reference table: {}", path.display());

        let file = std::fs::File::open(path).map_err(|e| ZipCodeError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        let table = Self::from_reader(file)?;
        log::info!("Loaded {} postcodes", table.len());
        Ok(table)
    }

    /// Reads reference CSV data from any reader.
    ///
    /// Malformed rows and rows with an empty postcode are skipped with a
    /// warning. A later row for the same postcode replaces an earlier one.
    ///
    /// # Errors
    ///
    /// Returns an error if the header cannot be read or lacks one of the
    /// required columns.
    pub fn from_reader(reader: impl Read) -> Result<Self, ZipCodeError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == *column) {
                return Err(ZipCodeError::MissingColumn((*column).to_string()));
            }
        }

        let mut entries = HashMap::new();
        for (row, result) in csv_reader.deserialize::<ZipCodeRecord>().enumerate() {
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("  skipping malformed reference row {}: {e}", row + 1);
                    continue;
                }
            };

            let Some(zip_code) = pad_zip_code(&record.zip_code) else {
                log::warn!("  skipping reference row {} with empty zip code", row + 1);
                continue;
            };

            entries.insert(zip_code, ZipCodeEntry::new(record.city, record.state));
        }

        Ok(Self::from_entries(entries))
    }

    /// Looks up a postcode.
    #[must_use]
    pub fn get(&self, postcode: &str) -> Option<&ZipCodeEntry> {
        self.entries.get(postcode)
    }

    /// Number of postcodes, overrides included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no postcodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn apply_overrides(&mut self) {
        for (postcode, city, state) in OVERRIDES {
            self.entries
                .insert((*postcode).to_string(), ZipCodeEntry::new(*city, *state));
        }
    }
}

/// Restores leading zeros lost by spreadsheet exports ("501" -> "00501").
/// Returns `None` for an empty code.
fn pad_zip_code(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.len() < 5 && raw.chars().all(|c| c.is_ascii_digit()) {
        return Some(format!("{raw:0>5}"));
    }
    Some(raw.to_string())
}

/// Errors from loading the postcode reference table.
#[derive(Debug, thiserror::Error)]
pub enum ZipCodeError {
    /// Reference file not found.
    #[error("Postcode reference file not found: {0}")]
    FileNotFound(String),

    /// I/O error opening the file.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The header lacks a required column.
    #[error("Postcode reference file is missing the `{0}` column")]
    MissingColumn(String),

    /// CSV error reading the header.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
zip_code,latitude,longitude,city,state,county
10001,40.75,-73.99,New York,NY,New York
10004,40.69,-74.01,Governors Island,NY,New York
501,40.81,-73.04,Holtsville,NY,Suffolk
07030,40.74,-74.03,Hoboken,NJ,Hudson
,0,0,Nowhere,NY,Nowhere
";

    #[test]
    fn loads_rows_and_ignores_extra_columns() {
        let table = ZipCodeTable::from_reader(CSV.as_bytes()).unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(
            table.get("10001"),
            Some(&ZipCodeEntry::new("New York", "NY"))
        );
        assert_eq!(table.get("07030").map(|e| e.state.as_str()), Some("NJ"));
    }

    #[test]
    fn pads_short_numeric_codes() {
        let table = ZipCodeTable::from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(table.get("00501").map(|e| e.city.as_str()), Some("Holtsville"));
        assert!(table.get("501").is_none());
    }

    #[test]
    fn override_beats_file_contents() {
        let table = ZipCodeTable::from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(
            table.get("10004"),
            Some(&ZipCodeEntry::new("New York", "NY"))
        );
    }

    #[test]
    fn override_applies_to_empty_table() {
        let table = ZipCodeTable::from_entries(Vec::new());
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("10004").map(|e| e.city.as_str()), Some("New York"));
    }

    #[test]
    fn later_row_replaces_earlier() {
        let csv = "zip_code,city,state\n10001,Manhattan,NY\n10001,New York,NY\n";
        let table = ZipCodeTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.get("10001").map(|e| e.city.as_str()), Some("New York"));
    }

    #[test]
    fn rejects_missing_column() {
        let csv = "zip,city,state\n10001,New York,NY\n";
        assert!(matches!(
            ZipCodeTable::from_reader(csv.as_bytes()),
            Err(ZipCodeError::MissingColumn(column)) if column == "zip_code"
        ));
    }

    #[test]
    fn reports_missing_file() {
        assert!(matches!(
            ZipCodeTable::from_path(Path::new("/nonexistent/zip_codes.csv")),
            Err(ZipCodeError::FileNotFound(_))
        ));
    }
}
