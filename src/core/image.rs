//! Image attachment encoding.
//!
//! Selected images travel inside the JSON payload as base64 data URLs
//! (`data:<mime>;base64,<data>`), so the whole file is read into memory and
//! encoded before the request is issued.

use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::debug;

#[derive(Debug)]
pub enum ImageError {
    /// The file could not be read from disk.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file extension does not map to an `image/*` MIME type.
    UnsupportedType { path: PathBuf, mime: String },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::Read { path, source } => {
                write!(f, "failed to read image {}: {}", path.display(), source)
            }
            ImageError::UnsupportedType { path, mime } => {
                write!(f, "{} is not an image ({mime})", path.display())
            }
        }
    }
}

impl StdError for ImageError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ImageError::Read { source, .. } => Some(source),
            ImageError::UnsupportedType { .. } => None,
        }
    }
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// MIME type guessed from the file extension. Anything outside `image/*` is
/// rejected.
pub fn image_mime_type(path: &Path) -> Result<String, ImageError> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        return Err(ImageError::UnsupportedType {
            path: path.to_path_buf(),
            mime: mime.essence_str().to_string(),
        });
    }
    Ok(mime.essence_str().to_string())
}

/// Read an image file and encode it as a data URL.
pub async fn read_image_data_url(path: &Path) -> Result<String, ImageError> {
    let mime = image_mime_type(path)?;
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ImageError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), %mime, bytes = bytes.len(), "encoded image attachment");
    Ok(encode_data_url(&mime, &bytes))
}
