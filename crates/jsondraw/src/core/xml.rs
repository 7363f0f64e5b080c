//! Minimal XML node tree and pretty printer
//!
//! Diagram elements render into [`XmlNode`] values; the document owns the
//! tree and serializes it once, with `quick-xml` handling escaping and
//! indentation. Attributes keep insertion order so output is stable.

use std::borrow::Cow;
use std::io::Cursor;

use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Writer;

use super::DiagramError;

type XmlWriter = Writer<Cursor<Vec<u8>>>;

const INDENT_WIDTH: usize = 2;

/// An element with ordered attributes and child elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlNode {
    /// Create an element with no attributes or children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Append an attribute, builder style
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Append a child element, builder style
    pub fn child(mut self, node: XmlNode) -> Self {
        self.children.push(node);
        self
    }

    /// Append a child element in place
    pub fn push_child(&mut self, node: XmlNode) {
        self.children.push(node);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up an attribute value by key
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Serialize this node as a complete document: declaration, two-space
    /// indentation, self-closed empty elements and a trailing newline.
    pub fn to_pretty_string(&self) -> Result<String, DiagramError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', INDENT_WIDTH);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_error)?;
        write_node(&mut writer, self)?;

        let bytes = writer.into_inner().into_inner();
        let mut text = String::from_utf8(bytes).map_err(xml_error)?;
        text.push('\n');
        Ok(text)
    }
}

fn write_node(writer: &mut XmlWriter, node: &XmlNode) -> Result<(), DiagramError> {
    let mut start = BytesStart::new(node.name.as_str());
    for (key, value) in &node.attributes {
        start.push_attribute(Attribute {
            key: QName(key.as_bytes()),
            value: Cow::Owned(escape_attribute(value).into_bytes()),
        });
    }

    if node.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(xml_error);
    }

    writer.write_event(Event::Start(start)).map_err(xml_error)?;
    for child in &node.children {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(node.name.as_str())))
        .map_err(xml_error)
}

/// Escape an attribute value, keeping line breaks and tabs as character
/// references so parsers do not normalize them to spaces
fn escape_attribute(value: &str) -> String {
    let escaped = escape(value);
    if !escaped.contains(['\n', '\r', '\t']) {
        return escaped.into_owned();
    }
    escaped
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
        .replace('\t', "&#9;")
}

fn xml_error<E: std::fmt::Display>(err: E) -> DiagramError {
    DiagramError::render_error(err.to_string())
}
