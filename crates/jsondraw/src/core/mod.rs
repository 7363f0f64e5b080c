//! Core infrastructure shared by the diagram components
//!
//! Error types, logging setup, and the XML node tree that elements render
//! into.

mod error;
pub mod logging;
mod xml;

pub use error::*;
pub use logging::*;
pub use xml::*;
