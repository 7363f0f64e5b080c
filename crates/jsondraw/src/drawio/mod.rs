//! draw.io document generation
//!
//! Components, leaf first:
//!
//! - [`style`]: default style strings per shape type
//! - [`element`]: shapes, image shapes, connectors and annotations, each
//!   rendering to one `mxCell`
//! - [`document`]: the `mxfile` skeleton, serialization and persistence
//! - [`builder`]: identifier allocation, logical-name resolution and the
//!   shapes → connectors → annotations build order
//!
//! [`spec`] holds the serde types of the JSON input and [`image`] embeds
//! local image files as data URLs.

pub mod builder;
pub mod document;
pub mod element;
pub mod image;
pub mod spec;
pub mod style;

pub use builder::*;
pub use document::*;
pub use element::*;
pub use image::{embed_image, guess_mime_type, normalize_path, EmbeddedImage, ImageError};
pub use spec::*;
pub use style::*;
