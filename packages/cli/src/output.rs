//! Output formatting for the CLI commands.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use osm_clean_address::{Diagnostics, Element};

/// `<INPUT>.json` next to the input, keeping the input's full file name.
pub fn default_output_path(input: &Path) -> PathBuf {
    let mut path = input.as_os_str().to_owned();
    path.push(".json");
    PathBuf::from(path)
}

/// Writes one element as a single line of JSON.
pub fn write_json_line(writer: &mut impl Write, element: &Element) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, element)?;
    writer.write_all(b"\n")
}

/// Prints each unclassified suffix token with the street names that
/// carried it.
pub fn write_unclassified(writer: &mut impl Write, diagnostics: &Diagnostics) -> io::Result<()> {
    let unclassified = diagnostics.unclassified_street_types();
    if unclassified.is_empty() {
        writeln!(writer, "No unclassified street types.")?;
        return Ok(());
    }

    for (token, names) in unclassified {
        writeln!(writer, "{token} ({})", names.len())?;
        for name in names {
            writeln!(writer, "  {name}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use osm_clean_address::{Address, ElementKind};

    use super::*;

    #[test]
    fn default_output_appends_json() {
        assert_eq!(
            default_output_path(Path::new("data/brooklyn.osm")),
            PathBuf::from("data/brooklyn.osm.json")
        );
        assert_eq!(
            default_output_path(Path::new("ny.osm.pbf")),
            PathBuf::from("ny.osm.pbf.json")
        );
    }

    #[test]
    fn writes_one_line_per_element() {
        let mut element = Element::new("42", ElementKind::Node);
        let mut address = Address::default();
        address.set("street", "Avenue X".to_string());
        element.address = Some(address);

        let mut out = Vec::new();
        write_json_line(&mut out, &element).unwrap();
        write_json_line(&mut out, &Element::new("43", ElementKind::Way)).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["id"], "42");
        assert_eq!(first["type"], "node");
        assert_eq!(first["address"]["street"], "Avenue X");
    }

    #[test]
    fn groups_unclassified_names_by_token() {
        let mut d = Diagnostics::new();
        d.record_unclassified_street("Pike", "Old Country Pike");
        d.record_unclassified_street("Pike", "Jericho Pike");
        d.record_unclassified_street("Broadway", "Broadway");

        let mut out = Vec::new();
        write_unclassified(&mut out, &d).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Broadway (1)\n  Broadway\nPike (2)\n  Jericho Pike\n  Old Country Pike\n"
        );
    }

    #[test]
    fn reports_clean_audit() {
        let mut out = Vec::new();
        write_unclassified(&mut out, &Diagnostics::new()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No unclassified street types.\n");
    }
}
