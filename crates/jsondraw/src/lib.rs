//! jsondraw - Turn JSON diagram descriptions into draw.io documents
//!
//! A description lists shapes, connectors and annotations. Shapes get
//! sequential cell ids, connectors find their endpoints by the shapes'
//! `value`, and the result is written as an indented `.drawio` XML file.
//!
//! # Quick Start
//!
//! ```rust
//! use jsondraw::convert;
//!
//! let json = r#"{
//!     "shapes": [{"value": "Client"}, {"value": "Server", "x": 200}],
//!     "connectors": [{"source": "Client", "target": "Server"}]
//! }"#;
//! let xml = convert(json).unwrap();
//! assert!(xml.contains(r#"value="Client""#));
//! assert!(xml.contains(r#"edge="1""#));
//! ```
//!
//! # Advanced Usage
//!
//! ```rust
//! use jsondraw::prelude::*;
//!
//! let mut builder = DiagramBuilder::new();
//! builder.styles_mut().add_style("cloud", "ellipse;shape=cloud;whiteSpace=wrap;html=1;");
//!
//! let api = builder.add_shape(&ShapeSpec::new("API").with_kind("cloud"));
//! let db = builder.add_shape(&ShapeSpec::new("DB").with_position(0.0, 120.0));
//! let edge = builder.add_connector(&ConnectorSpec::new("API", "DB"));
//! builder.add_annotation(&AnnotationSpec::new("Backend").with_position(0.0, 200.0));
//!
//! assert_eq!(api, CellId::new(2));
//! assert_eq!(db, CellId::new(3));
//! assert_eq!(edge, AddOutcome::Added(CellId::new(4)));
//!
//! let xml = builder.finish().unwrap();
//! assert!(xml.contains("shape=cloud"));
//! ```

use std::path::Path;

pub mod core;
pub mod drawio;

pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{DiagramError, XmlNode};
    pub use crate::drawio::{
        AddOutcome, AnnotationSpec, BuildReport, CellId, ConnectorSpec, DiagramBuilder,
        DiagramSpec, Document, DocumentConfig, Element, ElementKind, ShapeSpec, SkipReason,
        StyleRegistry,
    };
}

/// Convert a JSON description to draw.io XML text
///
/// Relative image paths resolve against the working directory. Items that
/// cannot be placed are left out, as in [`drawio::DiagramBuilder::build`].
///
/// # Example
/// ```rust
/// let xml = jsondraw::convert(r#"{"annotations": [{"value": "Hello"}]}"#).unwrap();
/// assert!(xml.contains(r#"value="Hello""#));
/// ```
pub fn convert(input: &str) -> anyhow::Result<String> {
    let spec = drawio::DiagramSpec::from_json_str(input)?;
    let mut builder = drawio::DiagramBuilder::new();
    builder.build(&spec);
    Ok(builder.finish()?)
}

/// Convert the JSON file at `input` and write the document to `output`
///
/// Relative image paths resolve against the working directory. Returns the
/// build report so callers can inspect skipped items.
pub fn convert_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> anyhow::Result<drawio::BuildReport> {
    let spec = drawio::DiagramSpec::from_path(input)?;
    let mut builder = drawio::DiagramBuilder::new();
    let report = builder.build(&spec);
    builder.save(output)?;
    Ok(report)
}
