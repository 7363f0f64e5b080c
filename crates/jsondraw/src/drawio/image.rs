//! Embedding local image files as base64 data URLs

use std::fs;
use std::path::{Component, Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;
use tracing::{debug, warn};

/// MIME type assumed when the extension gives no answer
pub const FALLBACK_MIME_TYPE: &str = "image/jpeg";

/// Reasons an image cannot be embedded
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Image file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read image '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Image content ready to be placed in a cell style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub mime_type: &'static str,
    pub data_url: String,
    pub byte_len: usize,
}

/// Fold `.` and `..` components without touching the filesystem
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                // `..` directly under the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }

    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// Resolve an image reference from the input against `base`
pub fn resolve_image_path(image_url: &str, base: Option<&Path>) -> PathBuf {
    let path = normalize_path(Path::new(image_url));
    match base {
        Some(base) if path.is_relative() => normalize_path(&base.join(path)),
        _ => path,
    }
}

/// Guess an image MIME type from the file extension
pub fn guess_mime_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" | "jpe" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "ico" => "image/vnd.microsoft.icon",
        "tif" | "tiff" => "image/tiff",
        _ => return None,
    };
    Some(mime)
}

/// Read an image file and encode it as a `data:` URL
pub fn embed_image(path: &Path) -> Result<EmbeddedImage, ImageError> {
    if !path.is_file() {
        return Err(ImageError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let mime_type = guess_mime_type(path).unwrap_or_else(|| {
        warn!(
            path = %path.display(),
            "Could not determine MIME type, defaulting to {}", FALLBACK_MIME_TYPE
        );
        FALLBACK_MIME_TYPE
    });

    let bytes = fs::read(path).map_err(|source| ImageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let data_url = format!("data:{};base64,{}", mime_type, STANDARD.encode(&bytes));
    debug!(path = %path.display(), mime_type, bytes = bytes.len(), "Embedded image");

    Ok(EmbeddedImage {
        mime_type,
        data_url,
        byte_len: bytes.len(),
    })
}
