//! OSM XML reader.
//!
//! Streams a `.osm` document with `quick-xml`. Each top-level `node` or
//! `way` is shaped from its attributes and its nested `tag` and `nd`
//! children, then handed to the callback before the next one is read.

use std::io::BufRead;

use osm_clean_address_models::Element;
use quick_xml::Reader;
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};

use crate::OsmError;
use crate::shape::ElementBuilder;

/// Reads every node and way from an OSM XML document, in document order.
///
/// Returns the number of elements passed to `on_element`.
///
/// # Errors
///
/// Returns [`OsmError::Parse`] if the document is not well-formed or
/// holds a name or attribute that is not valid UTF-8.
pub fn read_xml<R: BufRead>(
    source: R,
    mut on_element: impl FnMut(Element),
) -> Result<u64, OsmError> {
    let mut reader = Reader::from_reader(source);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut current: Option<ElementBuilder> = None;
    let mut count = 0u64;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(elem)) => {
                open_element(&elem, &mut current, &EventContext::new(&reader))?;
            }
            Ok(Event::Empty(elem)) => {
                let is_top_level = current.is_none();
                open_element(&elem, &mut current, &EventContext::new(&reader))?;
                // A self-closing node has no children to wait for.
                if is_top_level && let Some(builder) = current.take() {
                    on_element(builder.finish());
                    count += 1;
                }
            }
            Ok(Event::End(elem)) => {
                if matches!(elem.name().as_ref(), b"node" | b"way")
                    && let Some(builder) = current.take()
                {
                    on_element(builder.finish());
                    count += 1;
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(OsmError::Parse {
                    position: reader.error_position(),
                    message: e.to_string(),
                });
            }
        }
        buf.clear();
    }

    Ok(count)
}

/// Where the current event ended, and how to decode its bytes.
struct EventContext {
    position: u64,
    decoder: Decoder,
}

impl EventContext {
    fn new<R>(reader: &Reader<R>) -> Self {
        Self {
            position: reader.buffer_position(),
            decoder: reader.decoder(),
        }
    }

    fn error(&self, e: impl std::fmt::Display) -> OsmError {
        OsmError::Parse {
            position: self.position,
            message: e.to_string(),
        }
    }
}

/// Starts a new element for `node`/`way`, or feeds a `tag`/`nd` child to
/// the element being built. Children outside a node or way (e.g. the tags
/// of a relation) are ignored.
fn open_element(
    elem: &BytesStart<'_>,
    current: &mut Option<ElementBuilder>,
    context: &EventContext,
) -> Result<(), OsmError> {
    let name = elem.name();
    match name.as_ref() {
        b"node" | b"way" if current.is_none() => {
            let attributes = decode_attributes(elem, context)?;
            let element_name = context
                .decoder
                .decode(name.as_ref())
                .map_err(|e| context.error(e))?;
            *current = ElementBuilder::from_attributes(
                &element_name,
                attributes.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            );
        }
        b"tag" => {
            if let Some(builder) = current.as_mut() {
                let attributes = decode_attributes(elem, context)?;
                let key = find_attribute(&attributes, "k");
                let value = find_attribute(&attributes, "v");
                if let (Some(key), Some(value)) = (key, value) {
                    builder.tag(key, value);
                }
            }
        }
        b"nd" => {
            if let Some(builder) = current.as_mut() {
                let attributes = decode_attributes(elem, context)?;
                if let Some(node_id) = find_attribute(&attributes, "ref") {
                    builder.node_ref(node_id);
                }
            }
        }
        _ => {}
    }
    Ok(())
}

/// Decodes and unescapes every attribute. Bytes that are not valid UTF-8
/// are an error rather than being replaced.
fn decode_attributes(
    elem: &BytesStart<'_>,
    context: &EventContext,
) -> Result<Vec<(String, String)>, OsmError> {
    elem.attributes()
        .map(|attr| {
            let attr = attr.map_err(|e| context.error(e))?;
            let key = context
                .decoder
                .decode(attr.key.as_ref())
                .map_err(|e| context.error(e))?
                .into_owned();
            let value = attr
                .decode_and_unescape_value(context.decoder)
                .map_err(|e| context.error(e))?
                .into_owned();
            Ok((key, value))
        })
        .collect()
}

fn find_attribute<'a>(attributes: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
