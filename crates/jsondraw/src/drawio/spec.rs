//! Input description of a diagram
//!
//! The JSON input has three optional arrays (`shapes`, `connectors`,
//! `annotations`) and an optional `styles` object registering extra shape
//! types. Absent fields take their defaults; `null` strings read as empty.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::core::DiagramError;

/// Shape type whose `image_url` is embedded instead of styled
pub const IMAGE_SHAPE_TYPE: &str = "image";

/// Shape type used when the input names none
pub const DEFAULT_SHAPE_TYPE: &str = "rectangle";

/// A full diagram description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramSpec {
    pub shapes: Vec<ShapeSpec>,
    pub connectors: Vec<ConnectorSpec>,
    pub annotations: Vec<AnnotationSpec>,
    /// Extra entries for the style registry, keyed by shape type
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub styles: BTreeMap<String, String>,
}

impl DiagramSpec {
    /// Parse a description from JSON text
    pub fn from_json_str(input: &str) -> Result<Self, DiagramError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Read and parse a description from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DiagramError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| DiagramError::read_input(path, e))?;
        let spec = Self::from_json_str(&content)?;
        info!(
            path = %path.display(),
            shapes = spec.shapes.len(),
            connectors = spec.connectors.len(),
            annotations = spec.annotations.len(),
            "Loaded diagram description"
        );
        Ok(spec)
    }

    /// Total number of items in the description
    pub fn item_count(&self) -> usize {
        self.shapes.len() + self.connectors.len() + self.annotations.len()
    }
}

/// A shape or image entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeSpec {
    #[serde(rename = "type", deserialize_with = "string_or_default_type")]
    pub kind: String,
    /// Display text, also the logical name connectors refer to
    #[serde(deserialize_with = "string_or_empty")]
    pub value: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// Appended to the type's default style
    #[serde(deserialize_with = "string_or_empty")]
    pub styles: String,
    /// Local path of the image file, for `type == "image"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ShapeSpec {
    /// A rectangle labelled `value` with default geometry
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// An image shape labelled `value` loading `image_url`
    pub fn image(value: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            kind: IMAGE_SHAPE_TYPE.to_string(),
            value: value.into(),
            image_url: Some(image_url.into()),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_styles(mut self, styles: impl Into<String>) -> Self {
        self.styles = styles.into();
        self
    }

    pub fn is_image(&self) -> bool {
        self.kind == IMAGE_SHAPE_TYPE
    }
}

impl Default for ShapeSpec {
    fn default() -> Self {
        Self {
            kind: DEFAULT_SHAPE_TYPE.to_string(),
            value: String::new(),
            x: None,
            y: None,
            width: None,
            height: None,
            styles: String::new(),
            image_url: None,
        }
    }
}

/// A connector between two shapes, named by their `value`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorSpec {
    #[serde(deserialize_with = "string_or_empty")]
    pub source: String,
    #[serde(deserialize_with = "string_or_empty")]
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl ConnectorSpec {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            style: None,
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }
}

/// A free text label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationSpec {
    #[serde(deserialize_with = "string_or_empty")]
    pub value: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// Replaces the default annotation style when non-empty
    #[serde(deserialize_with = "string_or_empty")]
    pub styles: String,
}

impl AnnotationSpec {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_styles(mut self, styles: impl Into<String>) -> Self {
        self.styles = styles.into();
        self
    }
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_default_type<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .unwrap_or_else(|| DEFAULT_SHAPE_TYPE.to_string()))
}
