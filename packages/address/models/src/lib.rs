#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared types for OSM address cleaning.
//!
//! This crate contains only data types and simple conversions. It has no
//! heavyweight dependencies (no regex, no I/O).

use std::collections::BTreeMap;

use serde::Serialize;

/// The `addr:*` sub-structure of a shaped element.
///
/// The four fields the cleaner rewrites get typed slots. Any other
/// `addr:<name>` tag (e.g. `housenumber`) lands in [`Address::other`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Address {
    /// Street name, e.g. `"350 5th Ave."`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    /// City name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// State name or two-letter code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Postal code as tagged, possibly with ZIP+4 or stray text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    /// Remaining `addr:*` values keyed by the part after `addr:`.
    #[serde(flatten)]
    pub other: BTreeMap<String, String>,
}

impl Address {
    /// Stores a value under its `addr:` sub-key, routing the well-known
    /// keys to their typed slots. A repeated key overwrites.
    pub fn set(&mut self, key: &str, value: String) {
        match key {
            "street" => self.street = Some(value),
            "city" => self.city = Some(value),
            "state" => self.state = Some(value),
            "postcode" => self.postcode = Some(value),
            _ => {
                self.other.insert(key.to_string(), value);
            }
        }
    }
}

/// Which kind of OSM element a record was shaped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A point.
    Node,
    /// An ordered list of node references.
    Way,
}

impl ElementKind {
    /// The XML element name / JSON `type` value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
        }
    }

    /// Parses from an XML element name. Anything other than `node` or
    /// `way` is not shaped.
    #[must_use]
    pub fn from_tag_name(name: &str) -> Option<Self> {
        match name {
            "node" => Some(Self::Node),
            "way" => Some(Self::Way),
            _ => None,
        }
    }
}

/// Edit metadata copied from the element's attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Created {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changeset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

/// A shaped OSM node or way, the unit of work for the cleaner and the
/// unit of output for the JSON lines writer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    /// OSM id.
    pub id: String,
    /// Node or way.
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// The `visible` attribute, when the extract carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<String>,
    /// Edit metadata.
    pub created: Created,
    /// `[lat, lon]` when both coordinates are present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<[f64; 2]>,
    /// The `addr:*` tags, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// Referenced node ids, in order (ways only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub node_refs: Vec<String>,
    /// Every other tag, flattened into the top level.
    #[serde(flatten)]
    pub tags: BTreeMap<String, String>,
}

impl Element {
    /// Field names a flattened tag must not shadow.
    pub const FIELD_NAMES: &[&str] = &[
        "id",
        "type",
        "visible",
        "created",
        "pos",
        "address",
        "node_refs",
    ];

    /// Creates an element with no metadata, position, address, or tags.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            kind,
            visible: None,
            created: Created::default(),
            pos: None,
            address: None,
            node_refs: Vec::new(),
            tags: BTreeMap::new(),
        }
    }
}

/// One row of the postcode reference table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipCodeEntry {
    /// Authoritative city name.
    pub city: String,
    /// Two-letter state code.
    pub state: String,
}

impl ZipCodeEntry {
    /// Creates an entry from a city and state code.
    #[must_use]
    pub fn new(city: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            state: state.into(),
        }
    }
}
