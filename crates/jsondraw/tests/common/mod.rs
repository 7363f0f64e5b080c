//! Helpers for reading emitted documents back in tests

#![allow(dead_code)]

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One `<mxCell>` with its attributes and those of its `<mxGeometry>`
#[derive(Debug, Clone, Default)]
pub struct ParsedCell {
    pub attrs: BTreeMap<String, String>,
    pub geometry: Option<BTreeMap<String, String>>,
}

impl ParsedCell {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn geometry(&self, key: &str) -> Option<&str> {
        self.geometry.as_ref()?.get(key).map(String::as_str)
    }

    pub fn is_edge(&self) -> bool {
        self.get("edge") == Some("1")
    }

    pub fn is_vertex(&self) -> bool {
        self.get("vertex") == Some("1")
    }
}

/// Parsed outline of a document
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    /// Element names in document order
    pub elements: Vec<String>,
    pub mxfile: BTreeMap<String, String>,
    pub diagram: BTreeMap<String, String>,
    pub graph_model: BTreeMap<String, String>,
    pub cells: Vec<ParsedCell>,
}

impl ParsedDocument {
    /// Cells other than the reserved root and layer
    pub fn elements_cells(&self) -> Vec<&ParsedCell> {
        self.cells
            .iter()
            .filter(|c| !matches!(c.get("id"), Some("0") | Some("1")))
            .collect()
    }

    pub fn edges(&self) -> Vec<&ParsedCell> {
        self.cells.iter().filter(|c| c.is_edge()).collect()
    }

    pub fn vertices(&self) -> Vec<&ParsedCell> {
        self.cells.iter().filter(|c| c.is_vertex()).collect()
    }

    pub fn cell_by_value(&self, value: &str) -> Option<&ParsedCell> {
        self.cells.iter().find(|c| c.get("value") == Some(value))
    }
}

fn attrs_to_map(e: &BytesStart<'_>) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for a in e.attributes() {
        let a = a.expect("valid attribute");
        let key = String::from_utf8(a.key.as_ref().to_vec()).expect("utf-8 key");
        let val = a.unescape_value().expect("valid value").to_string();
        out.insert(key, val);
    }
    out
}

/// Parse a document produced by the builder; panics on malformed XML
pub fn parse_document(xml: &str) -> ParsedDocument {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut doc = ParsedDocument::default();

    loop {
        let start = match reader.read_event_into(&mut buf).expect("well-formed XML") {
            Event::Start(e) | Event::Empty(e) => Some(e.into_owned()),
            Event::Eof => break,
            _ => None,
        };
        buf.clear();
        let Some(start) = start else { continue };

        let name = String::from_utf8(start.name().as_ref().to_vec()).expect("utf-8 name");
        let attrs = attrs_to_map(&start);
        match name.as_str() {
            "mxfile" => doc.mxfile = attrs,
            "diagram" => doc.diagram = attrs,
            "mxGraphModel" => doc.graph_model = attrs,
            "mxCell" => doc.cells.push(ParsedCell {
                attrs,
                geometry: None,
            }),
            "mxGeometry" => {
                if let Some(cell) = doc.cells.last_mut() {
                    cell.geometry = Some(attrs);
                }
            }
            _ => {}
        }
        doc.elements.push(name);
    }

    doc
}
