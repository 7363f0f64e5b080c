//! Default styles per shape type
//!
//! Styles are draw.io style strings (`key=value;` directives). The registry
//! never parses them: a custom style is appended verbatim to the type
//! default, and draw.io lets the later value of a repeated key win.

use std::collections::BTreeMap;

use tracing::trace;

/// Style used for shape types without a registered default
pub const FALLBACK_STYLE: &str = "whiteSpace=wrap;html=1;";

/// Default style for the `rectangle` shape type
pub const RECTANGLE_STYLE: &str = "rounded=0;whiteSpace=wrap;html=1;";

/// Default style for the `ellipse` shape type
pub const ELLIPSE_STYLE: &str = "ellipse;whiteSpace=wrap;html=1;";

/// Mapping from shape type tag to its default style string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRegistry {
    styles: BTreeMap<String, String>,
}

impl StyleRegistry {
    /// Create a registry holding the built-in `rectangle` and `ellipse` styles
    pub fn new() -> Self {
        let mut styles = BTreeMap::new();
        styles.insert("rectangle".to_string(), RECTANGLE_STYLE.to_string());
        styles.insert("ellipse".to_string(), ELLIPSE_STYLE.to_string());
        Self { styles }
    }

    /// Create a registry with no entries; every lookup falls back
    pub fn empty() -> Self {
        Self {
            styles: BTreeMap::new(),
        }
    }

    /// Resolve the style for a shape type, appending `custom_styles` if given
    pub fn get_style(&self, shape_type: &str, custom_styles: Option<&str>) -> String {
        let base = self
            .styles
            .get(shape_type)
            .map(String::as_str)
            .unwrap_or(FALLBACK_STYLE);

        let mut style = base.to_string();
        if let Some(custom) = custom_styles.filter(|s| !s.is_empty()) {
            style.push_str(custom);
        }

        trace!(shape_type, style = %style, "Resolved style");
        style
    }

    /// Insert or replace the default style for a shape type
    pub fn add_style(&mut self, shape_type: impl Into<String>, style: impl Into<String>) {
        self.styles.insert(shape_type.into(), style.into());
    }

    /// Check whether a shape type has a registered default
    pub fn contains(&self, shape_type: &str) -> bool {
        self.styles.contains_key(shape_type)
    }

    /// Iterate over registered entries, sorted by shape type
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.styles.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
