#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! OpenStreetMap element readers.
//!
//! Streams nodes and ways out of an OSM XML (`.osm`) or PBF (`.osm.pbf`)
//! extract and shapes each one into an [`Element`] record: metadata under
//! `created`, coordinates under `pos`, `addr:*` tags under `address`, and
//! way node references under `node_refs`.
//!
//! Elements are handed to a callback one at a time in file order, so the
//! whole extract never has to fit in memory.

pub mod pbf;
pub mod progress;
pub mod shape;
pub mod xml;

use std::io::BufReader;
use std::path::Path;

use osm_clean_address_models::Element;

use crate::progress::ProgressCallback;

/// Reads every node and way in the extract at `path`.
///
/// Files ending in `.pbf` are decoded as PBF; anything else is treated as
/// OSM XML. Returns the number of elements read.
///
/// # Errors
///
/// Returns an error if the file does not exist, cannot be opened, or is
/// malformed.
pub fn read_elements(
    path: &Path,
    progress: &dyn ProgressCallback,
    mut on_element: impl FnMut(Element),
) -> Result<u64, OsmError> {
    if !path.exists() {
        return Err(OsmError::FileNotFound(path.display().to_string()));
    }

    log::info!("Reading OSM extract: {}", path.display());
    progress.set_message(format!("Reading {}", path.display()));

    let emit = |element: Element| {
        on_element(element);
        progress.inc(1);
    };

    let is_pbf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pbf"));

    let count = if is_pbf {
        pbf::read_pbf(path, emit)?
    } else {
        let file = std::fs::File::open(path).map_err(|e| OsmError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        xml::read_xml(BufReader::new(file), emit)?
    };

    progress.finish(format!("Read {count} elements"));
    log::info!("Read {count} elements from {}", path.display());
    Ok(count)
}

/// Errors from reading an OSM extract.
#[derive(Debug, thiserror::Error)]
pub enum OsmError {
    /// Extract file not found.
    #[error("OSM file not found: {0}")]
    FileNotFound(String),

    /// I/O error opening the file.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Malformed XML, or XML bytes that are not valid UTF-8.
    #[error("XML parse error at byte {position}: {message}")]
    Parse {
        /// Byte offset in the document the error was reported at.
        position: u64,
        /// Error description.
        message: String,
    },

    /// PBF decoding error.
    #[error("PBF error in {path}: {message}")]
    Pbf {
        /// Path that failed.
        path: String,
        /// Error description.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProgress;

    #[test]
    fn reports_missing_file() {
        let result = read_elements(Path::new("/nonexistent/map.osm"), &NullProgress, |_| {});
        assert!(matches!(result, Err(OsmError::FileNotFound(_))));
    }

    #[test]
    fn reads_xml_file_from_disk() {
        let path = std::env::temp_dir().join(format!("osm_clean_{}.osm", std::process::id()));
        std::fs::write(
            &path,
            r#"<osm><node id="7" lat="1" lon="2"><tag k="addr:state" v="ny"/></node></osm>"#,
        )
        .unwrap();

        let mut ids = Vec::new();
        let count = read_elements(&path, &NullProgress, |e| ids.push(e.id)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(count, 1);
        assert_eq!(ids, vec!["7"]);
    }
}
