//! The draw.io document skeleton
//!
//! A [`Document`] owns the `mxfile > diagram > mxGraphModel > root` structure
//! and the two reserved cells (`0`, the root, and `1`, the default layer).
//! Cells appended afterwards keep their order. Identifier allocation is not
//! done here; the builder hands out ids and appends already rendered nodes.

use std::fs;
use std::path::Path;

use tracing::{debug, span, Level};

use super::element::{DEFAULT_LAYER_ID, ROOT_CELL_ID};
use crate::core::{DiagramError, XmlNode};

/// Attributes of the `<mxfile>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub host: String,
    pub modified: String,
    pub agent: String,
    pub etag: String,
    pub version: String,
    pub file_type: String,
}

impl FileHeader {
    /// Replace the `modified` timestamp with the current UTC time
    ///
    /// This is the only wall-clock input to a document; without it two runs
    /// over the same description produce identical bytes.
    pub fn stamp_now(&mut self) {
        self.modified = chrono::Utc::now()
            .format("%Y-%m-%dT%H:%M:%S%.3fZ")
            .to_string();
    }

    fn to_node(&self) -> XmlNode {
        XmlNode::new("mxfile")
            .attr("host", self.host.as_str())
            .attr("modified", self.modified.as_str())
            .attr("agent", self.agent.as_str())
            .attr("etag", self.etag.as_str())
            .attr("version", self.version.as_str())
            .attr("type", self.file_type.as_str())
    }
}

impl Default for FileHeader {
    fn default() -> Self {
        Self {
            host: "app.diagrams.net".to_string(),
            modified: "2023-10-10T12:00:00.000Z".to_string(),
            agent: concat!("jsondraw ", env!("CARGO_PKG_VERSION")).to_string(),
            etag: "abcd1234".to_string(),
            version: "16.0.0".to_string(),
            file_type: "device".to_string(),
        }
    }
}

/// Canvas attributes of the `<mxGraphModel>` element
#[derive(Debug, Clone, PartialEq)]
pub struct GraphModelSettings {
    pub dx: u32,
    pub dy: u32,
    pub grid: bool,
    pub grid_size: u32,
    pub guides: bool,
    pub tooltips: bool,
    pub connect: bool,
    pub arrows: bool,
    pub fold: bool,
    pub page: bool,
    pub page_scale: f64,
    pub page_width: u32,
    pub page_height: u32,
}

impl GraphModelSettings {
    /// Attribute pairs in the order draw.io writes them
    pub fn to_attributes(&self) -> Vec<(&'static str, String)> {
        vec![
            ("dx", self.dx.to_string()),
            ("dy", self.dy.to_string()),
            ("grid", flag(self.grid)),
            ("gridSize", self.grid_size.to_string()),
            ("guides", flag(self.guides)),
            ("tooltips", flag(self.tooltips)),
            ("connect", flag(self.connect)),
            ("arrows", flag(self.arrows)),
            ("fold", flag(self.fold)),
            ("page", flag(self.page)),
            ("pageScale", super::element::format_number(self.page_scale)),
            ("pageWidth", self.page_width.to_string()),
            ("pageHeight", self.page_height.to_string()),
        ]
    }
}

impl Default for GraphModelSettings {
    fn default() -> Self {
        Self {
            dx: 1422,
            dy: 794,
            grid: true,
            grid_size: 10,
            guides: true,
            tooltips: true,
            connect: true,
            arrows: true,
            fold: true,
            page: true,
            page_scale: 1.0,
            page_width: 850,
            page_height: 1100,
        }
    }
}

fn flag(value: bool) -> String {
    let bit = if value { "1" } else { "0" };
    bit.to_string()
}

/// Everything fixed when a document is created
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentConfig {
    pub header: FileHeader,
    pub diagram_id: String,
    pub diagram_name: String,
    pub graph_model: GraphModelSettings,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            header: FileHeader::default(),
            diagram_id: "diagram-id".to_string(),
            diagram_name: "Page-1".to_string(),
            graph_model: GraphModelSettings::default(),
        }
    }
}

/// A single-page draw.io document under construction
#[derive(Debug, Clone)]
pub struct Document {
    config: DocumentConfig,
    cells: Vec<XmlNode>,
}

impl Document {
    /// Create a document holding only the root cell and the default layer
    pub fn create(config: DocumentConfig) -> Self {
        let cells = vec![
            XmlNode::new("mxCell").attr("id", ROOT_CELL_ID),
            XmlNode::new("mxCell")
                .attr("id", DEFAULT_LAYER_ID)
                .attr("parent", ROOT_CELL_ID),
        ];
        Self { config, cells }
    }

    /// Append a rendered cell under the document root
    pub fn append(&mut self, node: XmlNode) {
        debug!(id = node.attribute("id").unwrap_or(""), "Appending cell");
        self.cells.push(node);
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// All cells in document order, reserved cells included
    pub fn cells(&self) -> &[XmlNode] {
        &self.cells
    }

    /// Number of appended cells, not counting the two reserved ones
    pub fn element_count(&self) -> usize {
        self.cells.len().saturating_sub(2)
    }

    /// Assemble the full `mxfile` tree
    pub fn to_node(&self) -> XmlNode {
        let mut graph_model = XmlNode::new("mxGraphModel");
        for (key, value) in self.config.graph_model.to_attributes() {
            graph_model = graph_model.attr(key, value);
        }

        let mut root = XmlNode::new("root");
        for cell in &self.cells {
            root.push_child(cell.clone());
        }

        let diagram = XmlNode::new("diagram")
            .attr("id", self.config.diagram_id.as_str())
            .attr("name", self.config.diagram_name.as_str())
            .child(graph_model.child(root));

        self.config.header.to_node().child(diagram)
    }

    /// Serialize to indented XML text; identical cells give identical bytes
    pub fn render(&self) -> Result<String, DiagramError> {
        let render_span = span!(Level::DEBUG, "render_document", cells = self.cells.len());
        let _enter = render_span.enter();

        let text = self.to_node().to_pretty_string()?;
        debug!(bytes = text.len(), "Document rendered");
        Ok(text)
    }

    /// Write `text` to `path`, replacing any existing file
    pub fn persist(path: impl AsRef<Path>, text: &str) -> Result<(), DiagramError> {
        let path = path.as_ref();
        fs::write(path, text).map_err(|e| DiagramError::write_output(path, e))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::create(DocumentConfig::default())
    }
}
