//! Shapes one OSM node or way into an [`Element`].
//!
//! The builder is fed attributes, `tag` children, and `nd` children in
//! document order by whichever reader is decoding the file, then
//! finished into a record.

use std::sync::LazyLock;

use osm_clean_address_models::{Element, ElementKind};
use regex::Regex;

/// Characters that make a tag key unusable as a record field.
static PROBLEM_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[=+/&<>;'"?%#$@,. \t\r\n]"#).expect("valid regex"));

/// Accumulates the pieces of one element.
#[derive(Debug)]
pub struct ElementBuilder {
    element: Element,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl ElementBuilder {
    /// Starts an empty element of the given kind.
    #[must_use]
    pub fn new(kind: ElementKind, id: impl Into<String>) -> Self {
        Self {
            element: Element::new(id, kind),
            lat: None,
            lon: None,
        }
    }

    /// Starts an element from an XML element name and its attributes.
    /// Returns `None` for anything other than `node` or `way`.
    pub fn from_attributes<'a>(
        name: &str,
        attributes: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Option<Self> {
        let kind = ElementKind::from_tag_name(name)?;
        let mut builder = Self::new(kind, String::new());
        for (key, value) in attributes {
            builder.attribute(key, value);
        }
        Some(builder)
    }

    /// Applies one element attribute. Unknown attributes are ignored.
    pub fn attribute(&mut self, key: &str, value: &str) {
        let created = &mut self.element.created;
        match key {
            "id" => self.element.id = value.to_string(),
            "visible" => self.element.visible = Some(value.to_string()),
            "version" => created.version = Some(value.to_string()),
            "changeset" => created.changeset = Some(value.to_string()),
            "timestamp" => created.timestamp = Some(value.to_string()),
            "user" => created.user = Some(value.to_string()),
            "uid" => created.uid = Some(value.to_string()),
            "lat" => self.lat = value.trim().parse().ok(),
            "lon" => self.lon = value.trim().parse().ok(),
            _ => {}
        }
    }

    /// Sets both coordinates, for readers that decode them as numbers.
    pub const fn set_position(&mut self, lat: f64, lon: f64) {
        self.lat = Some(lat);
        self.lon = Some(lon);
    }

    /// Applies one `tag` child.
    ///
    /// `addr:<name>` goes into the address; `addr:<a>:<b>` and keys with
    /// problem characters are dropped, as are keys that would shadow an
    /// element field.
    pub fn tag(&mut self, key: &str, value: &str) {
        if PROBLEM_CHARS_RE.is_match(key) {
            log::trace!(
                "{} {}: dropping tag with problem characters: {key:?}",
                self.element.kind.as_str(),
                self.element.id
            );
            return;
        }

        if let Some(sub_key) = key.strip_prefix("addr:") {
            if sub_key.is_empty() || sub_key.contains(':') {
                log::trace!(
                    "{} {}: dropping qualified address tag: {key}",
                    self.element.kind.as_str(),
                    self.element.id
                );
                return;
            }
            self.element
                .address
                .get_or_insert_default()
                .set(sub_key, value.to_string());
            return;
        }

        if Element::FIELD_NAMES.contains(&key) {
            log::trace!(
                "{} {}: dropping tag that shadows a field: {key}",
                self.element.kind.as_str(),
                self.element.id
            );
            return;
        }

        self.element.tags.insert(key.to_string(), value.to_string());
    }

    /// Appends one `nd` reference. Only ways keep them.
    pub fn node_ref(&mut self, node_id: &str) {
        if self.element.kind == ElementKind::Way {
            self.element.node_refs.push(node_id.to_string());
        }
    }

    /// Produces the element. `pos` is set only when both coordinates parsed.
    #[must_use]
    pub fn finish(mut self) -> Element {
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            self.element.pos = Some([lat, lon]);
        }
        self.element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(attributes: &[(&str, &str)]) -> ElementBuilder {
        ElementBuilder::from_attributes("node", attributes.iter().copied()).unwrap()
    }

    #[test]
    fn copies_attributes() {
        let element = node(&[
            ("id", "261114295"),
            ("visible", "true"),
            ("version", "7"),
            ("changeset", "11129782"),
            ("timestamp", "2012-03-28T18:31:23Z"),
            ("user", "bbmiller"),
            ("uid", "451048"),
            ("lat", "41.9730791"),
            ("lon", "-87.6866303"),
        ])
        .finish();

        assert_eq!(element.id, "261114295");
        assert_eq!(element.kind, ElementKind::Node);
        assert_eq!(element.visible.as_deref(), Some("true"));
        assert_eq!(element.created.version.as_deref(), Some("7"));
        assert_eq!(element.created.user.as_deref(), Some("bbmiller"));
        assert_eq!(element.created.uid.as_deref(), Some("451048"));
        assert_eq!(element.pos, Some([41.973_079_1, -87.686_630_3]));
    }

    #[test]
    fn omits_position_without_both_coordinates() {
        assert_eq!(node(&[("id", "1"), ("lat", "40.7")]).finish().pos, None);
        assert_eq!(
            node(&[("id", "1"), ("lat", "north"), ("lon", "-74.0")])
                .finish()
                .pos,
            None
        );
    }

    #[test]
    fn routes_address_tags() {
        let mut builder = node(&[("id", "1")]);
        builder.tag("addr:street", "West Lexington St.");
        builder.tag("addr:housenumber", "1412");
        builder.tag("addr:postcode", "60612");
        builder.tag("addr:street:name", "Lexington");
        builder.tag("amenity", "pharmacy");
        builder.tag("name:en", "Walgreens");

        let element = builder.finish();
        let address = element.address.unwrap();

        assert_eq!(address.street.as_deref(), Some("West Lexington St."));
        assert_eq!(address.postcode.as_deref(), Some("60612"));
        assert_eq!(address.other.get("housenumber").map(String::as_str), Some("1412"));
        assert!(!address.other.contains_key("street:name"));
        assert_eq!(element.tags.get("amenity").map(String::as_str), Some("pharmacy"));
        assert_eq!(element.tags.get("name:en").map(String::as_str), Some("Walgreens"));
    }

    #[test]
    fn drops_problem_keys_and_field_shadows() {
        let mut builder = node(&[("id", "1")]);
        builder.tag("bad key", "x");
        builder.tag("fee?", "x");
        builder.tag("addr.street", "x");
        builder.tag("type", "multipolygon");
        builder.tag("address", "x");

        let element = builder.finish();

        assert!(element.tags.is_empty());
        assert!(element.address.is_none());
    }

    #[test]
    fn ways_collect_node_refs_in_order() {
        let mut builder = ElementBuilder::from_attributes("way", [("id", "209809850")]).unwrap();
        builder.node_ref("2199822281");
        builder.node_ref("2199822390");
        builder.node_ref("2199822392");

        let element = builder.finish();

        assert_eq!(element.kind, ElementKind::Way);
        assert_eq!(element.node_refs, vec!["2199822281", "2199822390", "2199822392"]);
    }

    #[test]
    fn nodes_ignore_node_refs() {
        let mut builder = node(&[("id", "1")]);
        builder.node_ref("2");
        assert!(builder.finish().node_refs.is_empty());
    }

    #[test]
    fn only_nodes_and_ways_are_shaped() {
        assert!(ElementBuilder::from_attributes("relation", [("id", "1")]).is_none());
        assert!(ElementBuilder::from_attributes("bounds", std::iter::empty()).is_none());
    }
}
