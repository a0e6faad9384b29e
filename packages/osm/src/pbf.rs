//! OSM PBF reader.
//!
//! Decodes blobs sequentially so elements reach the callback in file
//! order. Relations are skipped.

use std::path::Path;

use chrono::{DateTime, SecondsFormat};
use osm_clean_address_models::{Element, ElementKind};
use osmpbf::{DenseNodeInfo, ElementReader, Info};

use crate::OsmError;
use crate::shape::ElementBuilder;

/// Reads every node, dense node, and way from a PBF file.
///
/// Returns the number of elements passed to `on_element`.
///
/// # Errors
///
/// Returns [`OsmError::Pbf`] if the file cannot be opened or decoded.
pub fn read_pbf(path: &Path, mut on_element: impl FnMut(Element)) -> Result<u64, OsmError> {
    use osmpbf::Element as PbfElement;

    let reader = ElementReader::from_path(path).map_err(|e| OsmError::Pbf {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let mut count = 0u64;
    reader
        .for_each(|element| {
            let shaped = match element {
                PbfElement::Node(node) => shape_node(
                    node.id(),
                    Metadata::from_info(&node.info()).as_ref(),
                    node.lat(),
                    node.lon(),
                    node.tags(),
                ),
                PbfElement::DenseNode(node) => shape_node(
                    node.id(),
                    node.info().map(Metadata::from_dense_info).as_ref(),
                    node.lat(),
                    node.lon(),
                    node.tags(),
                ),
                PbfElement::Way(way) => shape_way(
                    way.id(),
                    Metadata::from_info(&way.info()).as_ref(),
                    way.refs(),
                    way.tags(),
                ),
                PbfElement::Relation(_) => return,
            };
            on_element(shaped);
            count += 1;
        })
        .map_err(|e| OsmError::Pbf {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    Ok(count)
}

/// The optional metadata block of a PBF element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Metadata {
    version: i32,
    changeset: Option<i64>,
    uid: Option<i32>,
    user: Option<String>,
    milli_timestamp: Option<i64>,
    visible: bool,
}

impl Metadata {
    /// Node and way metadata. `None` when the block carries no version,
    /// i.e. the extract was written without metadata.
    fn from_info(info: &Info<'_>) -> Option<Self> {
        Some(Self {
            version: info.version()?,
            changeset: info.changeset(),
            uid: info.uid(),
            user: info.user().and_then(Result::ok).map(str::to_string),
            milli_timestamp: info.milli_timestamp(),
            visible: info.visible(),
        })
    }

    fn from_dense_info(info: &DenseNodeInfo<'_>) -> Self {
        Self {
            version: info.version(),
            changeset: Some(info.changeset()),
            uid: Some(info.uid()),
            user: info.user().ok().map(str::to_string),
            milli_timestamp: Some(info.milli_timestamp()),
            visible: info.visible(),
        }
    }

    /// Copies the block into the builder as XML-style attribute strings.
    fn apply(&self, builder: &mut ElementBuilder) {
        builder.attribute("version", &self.version.to_string());
        builder.attribute("visible", &self.visible.to_string());
        if let Some(changeset) = self.changeset {
            builder.attribute("changeset", &changeset.to_string());
        }
        if let Some(uid) = self.uid {
            builder.attribute("uid", &uid.to_string());
        }
        if let Some(timestamp) = self.milli_timestamp.and_then(format_timestamp) {
            builder.attribute("timestamp", &timestamp);
        }
        if let Some(user) = &self.user {
            builder.attribute("user", user);
        }
    }
}

fn shape_node<'t>(
    id: i64,
    metadata: Option<&Metadata>,
    lat: f64,
    lon: f64,
    tags: impl IntoIterator<Item = (&'t str, &'t str)>,
) -> Element {
    let mut builder = ElementBuilder::new(ElementKind::Node, id.to_string());
    if let Some(metadata) = metadata {
        metadata.apply(&mut builder);
    }
    builder.set_position(lat, lon);
    for (key, value) in tags {
        builder.tag(key, value);
    }
    builder.finish()
}

fn shape_way<'t>(
    id: i64,
    metadata: Option<&Metadata>,
    refs: impl IntoIterator<Item = i64>,
    tags: impl IntoIterator<Item = (&'t str, &'t str)>,
) -> Element {
    let mut builder = ElementBuilder::new(ElementKind::Way, id.to_string());
    if let Some(metadata) = metadata {
        metadata.apply(&mut builder);
    }
    for node_id in refs {
        builder.node_ref(&node_id.to_string());
    }
    for (key, value) in tags {
        builder.tag(key, value);
    }
    builder.finish()
}

/// Formats epoch milliseconds the way OSM XML spells timestamps.
fn format_timestamp(millis: i64) -> Option<String> {
    DateTime::from_timestamp_millis(millis).map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
}
