//! Turning a diagram description into a document
//!
//! The builder owns the identifier counter and the logical-name map for one
//! build. Shapes are added first so that connectors can resolve their
//! endpoints by `value`, then connectors, then annotations. Items that
//! cannot be placed are skipped with a [`SkipReason`] and the build goes on.
//!
//! ```rust
//! use jsondraw::drawio::{ConnectorSpec, DiagramBuilder, ShapeSpec};
//!
//! let mut builder = DiagramBuilder::new();
//! let a = builder.add_shape(&ShapeSpec::new("A"));
//! let b = builder.add_shape(&ShapeSpec::new("B"));
//! let edge = builder.add_connector(&ConnectorSpec::new("A", "B"));
//! assert_eq!(a.to_string(), "2");
//! assert_eq!(b.to_string(), "3");
//! assert!(edge.is_added());
//!
//! let xml = builder.finish().unwrap();
//! assert!(xml.contains(r#"source="2" target="3""#));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, span, trace, warn, Level};

use super::document::{Document, DocumentConfig};
use super::element::{
    Annotation, CellId, Connector, Element, Geometry, ImageShape, Shape, DEFAULT_ANNOTATION_STYLE,
    DEFAULT_LAYER_ID, FIRST_ELEMENT_ID,
};
use super::image::{embed_image, resolve_image_path, ImageError};
use super::spec::{AnnotationSpec, ConnectorSpec, DiagramSpec, ShapeSpec};
use super::style::StyleRegistry;
use crate::core::DiagramError;

/// Why an item was left out of the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The image path does not name a regular file
    MissingImage { value: String, path: PathBuf },
    /// The image file exists but could not be read
    UnreadableImage {
        value: String,
        path: PathBuf,
        message: String,
    },
    /// A connector endpoint matches no shape `value`
    UnresolvedConnector {
        source: String,
        target: String,
        source_found: bool,
        target_found: bool,
    },
}

impl SkipReason {
    fn from_image_error(value: &str, err: ImageError) -> Self {
        match err {
            ImageError::NotFound { path } => SkipReason::MissingImage {
                value: value.to_string(),
                path,
            },
            ImageError::Read { path, source } => SkipReason::UnreadableImage {
                value: value.to_string(),
                path,
                message: source.to_string(),
            },
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingImage { value, path } => {
                write!(f, "image shape '{}': file not found: {}", value, path.display())
            }
            SkipReason::UnreadableImage {
                value,
                path,
                message,
            } => write!(
                f,
                "image shape '{}': cannot read {}: {}",
                value,
                path.display(),
                message
            ),
            SkipReason::UnresolvedConnector {
                source,
                target,
                source_found,
                target_found,
            } => {
                let missing: Vec<&str> = [(source, source_found), (target, target_found)]
                    .into_iter()
                    .filter(|(_, found)| !**found)
                    .map(|(name, _)| name.as_str())
                    .collect();
                write!(
                    f,
                    "connector '{}' -> '{}': no shape named {}",
                    source,
                    target,
                    missing
                        .iter()
                        .map(|name| format!("'{}'", name))
                        .collect::<Vec<_>>()
                        .join(" or ")
                )
            }
        }
    }
}

/// Result of a single `add_*` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(CellId),
    Skipped(SkipReason),
}

impl AddOutcome {
    /// The new element's id, if it was added
    pub fn id(&self) -> Option<CellId> {
        match self {
            AddOutcome::Added(id) => Some(*id),
            AddOutcome::Skipped(_) => None,
        }
    }

    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added(_))
    }
}

/// What a [`DiagramBuilder::build`] call placed and skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Shapes and image shapes, in input order
    pub shapes: Vec<CellId>,
    pub connectors: Vec<CellId>,
    pub annotations: Vec<CellId>,
    pub skipped: Vec<SkipReason>,
}

impl BuildReport {
    pub fn added_count(&self) -> usize {
        self.shapes.len() + self.connectors.len() + self.annotations.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Check whether every item of the description was placed
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    fn record(&mut self, outcome: AddOutcome, placed: impl FnOnce(&mut Self) -> &mut Vec<CellId>) {
        match outcome {
            AddOutcome::Added(id) => placed(self).push(id),
            AddOutcome::Skipped(reason) => self.skipped.push(reason),
        }
    }
}

/// A document written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDiagram {
    pub path: PathBuf,
    pub bytes: usize,
    /// Number of elements, not counting the reserved cells
    pub cells: usize,
}

/// Builds one document from shapes, connectors and annotations
///
/// The builder is open until [`save`](Self::save) or
/// [`finish`](Self::finish) consumes it.
#[derive(Debug)]
pub struct DiagramBuilder {
    document: Document,
    styles: StyleRegistry,
    next_id: CellId,
    names: HashMap<String, CellId>,
    asset_root: Option<PathBuf>,
}

impl DiagramBuilder {
    /// Create a builder with the default document settings and styles
    pub fn new() -> Self {
        Self::with_config(DocumentConfig::default())
    }

    /// Create a builder for a document with the given settings
    pub fn with_config(config: DocumentConfig) -> Self {
        Self {
            document: Document::create(config),
            styles: StyleRegistry::new(),
            next_id: CellId::new(FIRST_ELEMENT_ID),
            names: HashMap::new(),
            asset_root: None,
        }
    }

    /// Replace the style registry
    pub fn with_styles(mut self, styles: StyleRegistry) -> Self {
        self.styles = styles;
        self
    }

    /// Resolve relative image paths against `root` instead of the working directory
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = Some(root.into());
        self
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    pub fn styles_mut(&mut self) -> &mut StyleRegistry {
        &mut self.styles
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Id of the shape currently registered under a logical name
    pub fn lookup(&self, name: &str) -> Option<CellId> {
        self.names.get(name).copied()
    }

    /// The id the next added element will get
    pub fn next_id(&self) -> CellId {
        self.next_id
    }

    /// Add a styled shape; the `kind` selects the default style
    pub fn add_shape(&mut self, spec: &ShapeSpec) -> CellId {
        let style = self.styles.get_style(&spec.kind, Some(&spec.styles));
        let id = self.place(|id| {
            Shape {
                id,
                parent: DEFAULT_LAYER_ID.to_string(),
                value: spec.value.clone(),
                style,
                geometry: shape_geometry(spec),
            }
            .into()
        });
        info!(value = %spec.value, shape_type = %spec.kind, %id, "Added shape");
        self.register_name(&spec.value, id);
        id
    }

    /// Add a shape showing the image at `spec.image_url`
    ///
    /// The image style is fixed; `spec.styles` is not used.
    pub fn add_image_shape(&mut self, spec: &ShapeSpec) -> AddOutcome {
        let image_url = spec.image_url.as_deref().unwrap_or_default();
        let path = resolve_image_path(image_url, self.asset_root.as_deref());

        let image = match embed_image(&path) {
            Ok(image) => image,
            Err(err) => {
                warn!(value = %spec.value, error = %err, "Skipping image shape");
                return AddOutcome::Skipped(SkipReason::from_image_error(&spec.value, err));
            }
        };

        if !spec.styles.is_empty() {
            debug!(value = %spec.value, "Custom styles are not applied to image shapes");
        }

        let byte_len = image.byte_len;
        let id = self.place(|id| {
            ImageShape {
                id,
                parent: DEFAULT_LAYER_ID.to_string(),
                value: spec.value.clone(),
                image_url: image.data_url,
                geometry: shape_geometry(spec),
            }
            .into()
        });
        info!(
            value = %spec.value,
            path = %path.display(),
            bytes = byte_len,
            %id,
            "Added image shape"
        );
        self.register_name(&spec.value, id);
        AddOutcome::Added(id)
    }

    /// Add a shape or an image shape depending on `spec.kind`
    pub fn add_vertex(&mut self, spec: &ShapeSpec) -> AddOutcome {
        if spec.is_image() {
            self.add_image_shape(spec)
        } else {
            AddOutcome::Added(self.add_shape(spec))
        }
    }

    /// Add a connector between two shapes named by their `value`
    ///
    /// Nothing is added unless both endpoints resolve.
    pub fn add_connector(&mut self, spec: &ConnectorSpec) -> AddOutcome {
        let (source, target) = match (self.lookup(&spec.source), self.lookup(&spec.target)) {
            (Some(source), Some(target)) => (source, target),
            (source, target) => {
                warn!(
                    source = %spec.source,
                    target = %spec.target,
                    source_found = source.is_some(),
                    target_found = target.is_some(),
                    "Connector cannot be created"
                );
                return AddOutcome::Skipped(SkipReason::UnresolvedConnector {
                    source: spec.source.clone(),
                    target: spec.target.clone(),
                    source_found: source.is_some(),
                    target_found: target.is_some(),
                });
            }
        };

        let id = self.place(|id| {
            Connector {
                id,
                parent: DEFAULT_LAYER_ID.to_string(),
                source,
                target,
                style: spec.style.clone().unwrap_or_default(),
            }
            .into()
        });
        info!(source = %spec.source, target = %spec.target, %id, "Added connector");
        AddOutcome::Added(id)
    }

    /// Add a text annotation; annotations are never connector endpoints
    pub fn add_annotation(&mut self, spec: &AnnotationSpec) -> CellId {
        let style = if spec.styles.is_empty() {
            DEFAULT_ANNOTATION_STYLE.to_string()
        } else {
            spec.styles.clone()
        };

        let id = self.place(|id| {
            Annotation {
                id,
                parent: DEFAULT_LAYER_ID.to_string(),
                value: spec.value.clone(),
                style,
                geometry: Geometry {
                    x: spec.x,
                    y: spec.y,
                    width: spec.width,
                    height: spec.height,
                },
            }
            .into()
        });
        info!(value = %spec.value, %id, "Added annotation");
        id
    }

    /// Add every item of a description: shapes, then connectors, then annotations
    pub fn build(&mut self, spec: &DiagramSpec) -> BuildReport {
        let build_span = span!(
            Level::INFO,
            "build_diagram",
            shapes = spec.shapes.len(),
            connectors = spec.connectors.len(),
            annotations = spec.annotations.len()
        );
        let _enter = build_span.enter();

        for (shape_type, style) in &spec.styles {
            debug!(shape_type = %shape_type, "Registering style");
            self.styles.add_style(shape_type.as_str(), style.as_str());
        }

        let mut report = BuildReport::default();
        for shape in &spec.shapes {
            let outcome = self.add_vertex(shape);
            report.record(outcome, |r| &mut r.shapes);
        }
        for connector in &spec.connectors {
            let outcome = self.add_connector(connector);
            report.record(outcome, |r| &mut r.connectors);
        }
        for annotation in &spec.annotations {
            let id = self.add_annotation(annotation);
            report.annotations.push(id);
        }

        info!(
            added = report.added_count(),
            skipped = report.skipped_count(),
            "Build completed"
        );
        report
    }

    /// Serialize the document to XML text
    pub fn render(&self) -> Result<String, DiagramError> {
        self.document.render()
    }

    /// Close the builder and return the XML text
    pub fn finish(self) -> Result<String, DiagramError> {
        self.render()
    }

    /// Close the builder and write the document to `path`, replacing any file there
    pub fn save(self, path: impl AsRef<Path>) -> Result<SavedDiagram, DiagramError> {
        let path = path.as_ref();
        let save_span = span!(Level::INFO, "save_diagram", path = %path.display());
        let _enter = save_span.enter();

        let text = self.render()?;
        Document::persist(path, &text)?;

        let saved = SavedDiagram {
            path: path.to_path_buf(),
            bytes: text.len(),
            cells: self.document.element_count(),
        };
        info!(bytes = saved.bytes, cells = saved.cells, "Diagram saved");
        Ok(saved)
    }

    /// Allocate the next id, build the element with it and append it
    fn place(&mut self, make: impl FnOnce(CellId) -> Element) -> CellId {
        let id = self.next_id;
        let element = make(id);
        trace!(%id, kind = %element.kind(), parent = element.parent(), "Allocated cell id");
        self.document.append(element.to_node());
        self.next_id = id.next();
        id
    }

    fn register_name(&mut self, value: &str, id: CellId) {
        if value.is_empty() {
            warn!(%id, "Shape without a value cannot be a connector endpoint");
            return;
        }
        if let Some(previous) = self.names.insert(value.to_string(), id) {
            warn!(
                value,
                %previous,
                current = %id,
                "Repeated shape value, connectors will use the latest shape"
            );
        }
    }
}

impl Default for DiagramBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn shape_geometry(spec: &ShapeSpec) -> Geometry {
    Geometry {
        x: spec.x,
        y: spec.y,
        width: spec.width,
        height: spec.height,
    }
}
