//! Diagram element records and their `<mxCell>` rendering
//!
//! The set of element kinds is closed: vertices ([`Shape`], [`ImageShape`],
//! [`Annotation`]) and edges ([`Connector`]). Each renders into one
//! `mxCell` node with a nested `mxGeometry`.

use std::fmt;

use crate::core::XmlNode;

/// Identifier of the implicit root cell
pub const ROOT_CELL_ID: &str = "0";

/// Identifier of the default layer every element is parented to
pub const DEFAULT_LAYER_ID: &str = "1";

/// First identifier handed out to a user element
pub const FIRST_ELEMENT_ID: u32 = 2;

/// Style used for connectors without an explicit style
pub const DEFAULT_EDGE_STYLE: &str =
    "edgeStyle=orthogonalEdgeStyle;rounded=0;orthogonalLoop=1;jettySize=auto;loopDirection=0;";

/// Style used for annotations without an explicit style
pub const DEFAULT_ANNOTATION_STYLE: &str = "textColor=#000000;align=center;";

/// Default size of shapes and image shapes
pub const SHAPE_SIZE: Size = Size::new(80.0, 40.0);

/// Default size of annotations
pub const ANNOTATION_SIZE: Size = Size::new(200.0, 40.0);

/// Identifier of a cell within one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(u32);

impl CellId {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    /// The identifier following this one
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Width and height of a vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Position and size of a vertex; missing fields are filled in at render time
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Geometry {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl Geometry {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
        }
    }

    /// Geometry with a position and the element's default size
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    fn to_node(self, default_size: Size) -> XmlNode {
        XmlNode::new("mxGeometry")
            .attr("x", format_number(self.x.unwrap_or(0.0)))
            .attr("y", format_number(self.y.unwrap_or(0.0)))
            .attr(
                "width",
                format_number(self.width.unwrap_or(default_size.width)),
            )
            .attr(
                "height",
                format_number(self.height.unwrap_or(default_size.height)),
            )
            .attr("as", "geometry")
            .attr("relative", "0")
    }
}

/// A styled vertex with display text
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: CellId,
    pub parent: String,
    pub value: String,
    pub style: String,
    pub geometry: Geometry,
}

/// A vertex showing an embedded image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageShape {
    pub id: CellId,
    pub parent: String,
    pub value: String,
    /// Usually a `data:` URL carrying the base64 image content
    pub image_url: String,
    pub geometry: Geometry,
}

impl ImageShape {
    /// The fixed style of image cells
    pub fn style(&self) -> String {
        format!("shape=image;image={};", self.image_url)
    }
}

/// An edge between two existing vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub id: CellId,
    pub parent: String,
    pub source: CellId,
    pub target: CellId,
    /// Empty means [`DEFAULT_EDGE_STYLE`]
    pub style: String,
}

/// A free-standing text label; not a connector endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub id: CellId,
    pub parent: String,
    pub value: String,
    pub style: String,
    pub geometry: Geometry,
}

/// Discriminant of [`Element`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Shape,
    Image,
    Connector,
    Annotation,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Shape => write!(f, "shape"),
            ElementKind::Image => write!(f, "image"),
            ElementKind::Connector => write!(f, "connector"),
            ElementKind::Annotation => write!(f, "annotation"),
        }
    }
}

/// Any element that can be placed in a document
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Shape(Shape),
    Image(ImageShape),
    Connector(Connector),
    Annotation(Annotation),
}

impl Element {
    pub fn id(&self) -> CellId {
        match self {
            Element::Shape(e) => e.id,
            Element::Image(e) => e.id,
            Element::Connector(e) => e.id,
            Element::Annotation(e) => e.id,
        }
    }

    pub fn parent(&self) -> &str {
        match self {
            Element::Shape(e) => &e.parent,
            Element::Image(e) => &e.parent,
            Element::Connector(e) => &e.parent,
            Element::Annotation(e) => &e.parent,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Shape(_) => ElementKind::Shape,
            Element::Image(_) => ElementKind::Image,
            Element::Connector(_) => ElementKind::Connector,
            Element::Annotation(_) => ElementKind::Annotation,
        }
    }

    /// Check whether this element is drawn as a vertex
    pub fn is_vertex(&self) -> bool {
        !matches!(self, Element::Connector(_))
    }

    /// Render this element as an `mxCell` node
    pub fn to_node(&self) -> XmlNode {
        match self {
            Element::Shape(shape) => vertex_node(
                shape.id,
                &shape.parent,
                &shape.value,
                &shape.style,
                shape.geometry,
                SHAPE_SIZE,
            ),
            Element::Image(image) => vertex_node(
                image.id,
                &image.parent,
                &image.value,
                &image.style(),
                image.geometry,
                SHAPE_SIZE,
            ),
            Element::Annotation(annotation) => vertex_node(
                annotation.id,
                &annotation.parent,
                &annotation.value,
                &annotation.style,
                annotation.geometry,
                ANNOTATION_SIZE,
            ),
            Element::Connector(connector) => {
                let style = if connector.style.is_empty() {
                    DEFAULT_EDGE_STYLE
                } else {
                    connector.style.as_str()
                };
                XmlNode::new("mxCell")
                    .attr("id", connector.id.to_string())
                    .attr("value", "")
                    .attr("style", style)
                    .attr("edge", "1")
                    .attr("parent", connector.parent.as_str())
                    .attr("source", connector.source.to_string())
                    .attr("target", connector.target.to_string())
                    .child(
                        XmlNode::new("mxGeometry")
                            .attr("relative", "1")
                            .attr("as", "geometry"),
                    )
            }
        }
    }
}

impl From<Shape> for Element {
    fn from(shape: Shape) -> Self {
        Element::Shape(shape)
    }
}

impl From<ImageShape> for Element {
    fn from(image: ImageShape) -> Self {
        Element::Image(image)
    }
}

impl From<Connector> for Element {
    fn from(connector: Connector) -> Self {
        Element::Connector(connector)
    }
}

impl From<Annotation> for Element {
    fn from(annotation: Annotation) -> Self {
        Element::Annotation(annotation)
    }
}

fn vertex_node(
    id: CellId,
    parent: &str,
    value: &str,
    style: &str,
    geometry: Geometry,
    default_size: Size,
) -> XmlNode {
    XmlNode::new("mxCell")
        .attr("id", id.to_string())
        .attr("value", value)
        .attr("style", style)
        .attr("vertex", "1")
        .attr("parent", parent)
        .child(geometry.to_node(default_size))
}

/// Shortest round-trip form: `80`, `12.5`, `-3`
pub(crate) fn format_number(value: f64) -> String {
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(geometry: Geometry) -> Element {
        Element::Shape(Shape {
            id: CellId::new(2),
            parent: DEFAULT_LAYER_ID.to_string(),
            value: "API".to_string(),
            style: "rounded=0;".to_string(),
            geometry,
        })
    }

    fn geometry_of(node: &XmlNode) -> &XmlNode {
        &node.children()[0]
    }

    #[test]
    fn test_cell_id_display_and_next() {
        let id = CellId::new(FIRST_ELEMENT_ID);
        assert_eq!(id.to_string(), "2");
        assert_eq!(id.next(), CellId::new(3));
        assert!(id < id.next());
    }

    #[test]
    fn test_shape_node_attributes() {
        let node = shape(Geometry::new(10.0, 20.0, 120.0, 60.0)).to_node();
        let keys: Vec<_> = node.attributes().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["id", "value", "style", "vertex", "parent"]);
        assert_eq!(node.attribute("id"), Some("2"));
        assert_eq!(node.attribute("value"), Some("API"));
        assert_eq!(node.attribute("vertex"), Some("1"));
        assert_eq!(node.attribute("parent"), Some("1"));

        let geometry = geometry_of(&node);
        assert_eq!(geometry.name(), "mxGeometry");
        assert_eq!(geometry.attribute("x"), Some("10"));
        assert_eq!(geometry.attribute("width"), Some("120"));
        assert_eq!(geometry.attribute("as"), Some("geometry"));
        assert_eq!(geometry.attribute("relative"), Some("0"));
    }

    #[test]
    fn test_shape_default_geometry_at_render_time() {
        let node = shape(Geometry::default()).to_node();
        let geometry = geometry_of(&node);
        assert_eq!(geometry.attribute("x"), Some("0"));
        assert_eq!(geometry.attribute("y"), Some("0"));
        assert_eq!(geometry.attribute("width"), Some("80"));
        assert_eq!(geometry.attribute("height"), Some("40"));
    }

    #[test]
    fn test_annotation_default_size() {
        let node = Element::Annotation(Annotation {
            id: CellId::new(7),
            parent: DEFAULT_LAYER_ID.to_string(),
            value: "Note".to_string(),
            style: DEFAULT_ANNOTATION_STYLE.to_string(),
            geometry: Geometry::at(5.0, 5.5),
        })
        .to_node();
        let geometry = geometry_of(&node);
        assert_eq!(geometry.attribute("y"), Some("5.5"));
        assert_eq!(geometry.attribute("width"), Some("200"));
        assert_eq!(geometry.attribute("height"), Some("40"));
    }

    #[test]
    fn test_image_style_is_fixed() {
        let image = ImageShape {
            id: CellId::new(3),
            parent: DEFAULT_LAYER_ID.to_string(),
            value: "Logo".to_string(),
            image_url: "data:image/png;base64,AAAA".to_string(),
            geometry: Geometry::default(),
        };
        let node = Element::Image(image).to_node();
        assert_eq!(
            node.attribute("style"),
            Some("shape=image;image=data:image/png;base64,AAAA;")
        );
    }

    #[test]
    fn test_connector_node() {
        let connector = Element::Connector(Connector {
            id: CellId::new(4),
            parent: DEFAULT_LAYER_ID.to_string(),
            source: CellId::new(2),
            target: CellId::new(3),
            style: String::new(),
        });
        assert!(!connector.is_vertex());
        assert_eq!(connector.kind(), ElementKind::Connector);
        assert_eq!(connector.parent(), DEFAULT_LAYER_ID);
        assert_eq!(connector.id(), CellId::new(4));

        let node = connector.to_node();
        let keys: Vec<_> = node.attributes().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec!["id", "value", "style", "edge", "parent", "source", "target"]
        );
        assert_eq!(node.attribute("style"), Some(DEFAULT_EDGE_STYLE));
        assert_eq!(node.attribute("source"), Some("2"));
        assert_eq!(node.attribute("target"), Some("3"));

        let geometry = geometry_of(&node);
        assert_eq!(geometry.attribute("relative"), Some("1"));
        assert_eq!(geometry.attribute("x"), None);
    }

    #[test]
    fn test_connector_custom_style() {
        let node = Element::Connector(Connector {
            id: CellId::new(4),
            parent: DEFAULT_LAYER_ID.to_string(),
            source: CellId::new(2),
            target: CellId::new(3),
            style: "dashed=1;".to_string(),
        })
        .to_node();
        assert_eq!(node.attribute("style"), Some("dashed=1;"));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(80.0), "80");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(-3.0), "-3");
    }
}
