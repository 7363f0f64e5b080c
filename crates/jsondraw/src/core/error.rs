//! Core error types for diagram generation
//!
//! Only document-level failures live here: the input cannot be loaded, the
//! document cannot be serialized, or the output cannot be written. Problems
//! with a single shape or connector are reported as skip outcomes by the
//! builder instead.

use std::path::PathBuf;

use thiserror::Error;

/// Core error types for diagram generation
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Failed to read input '{}': {source}", .path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid diagram description: {source}")]
    InvalidInput {
        #[from]
        source: serde_json::Error,
    },

    #[error("Render error: {message}")]
    RenderError { message: String },

    #[error("Failed to write output '{}': {source}", .path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl DiagramError {
    /// Create a new input read error
    pub fn read_input(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadInput {
            path: path.into(),
            source,
        }
    }

    /// Create a new render error
    pub fn render_error(message: impl Into<String>) -> Self {
        Self::RenderError {
            message: message.into(),
        }
    }

    /// Create a new output write error
    pub fn write_output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteOutput {
            path: path.into(),
            source,
        }
    }
}
