//! Conversion between filesystem paths and `file://` URIs.

use std::path::{Path, PathBuf};

use lsp_types::Uri;
use thiserror::Error;
use url::Url;

/// Raised when a path cannot be expressed as a `file://` URI.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot convert {path} to a file URI")]
pub struct UriError {
    path: String,
}

/// Converts an absolute path to a `file://` URI with percent-encoding.
///
/// # Errors
///
/// Returns [`UriError`] for relative paths.
pub fn path_to_uri(path: &Path) -> Result<Uri, UriError> {
    let error = || UriError {
        path: path.display().to_string(),
    };
    let url = Url::from_file_path(path).map_err(|()| error())?;
    url.as_str().parse().map_err(|_| error())
}

/// Converts a `file://` URI back to a path, decoding percent escapes.
///
/// Returns `None` for URIs with another scheme.
#[must_use]
pub fn uri_to_path(uri: &Uri) -> Option<PathBuf> {
    Url::parse(uri.as_str()).ok()?.to_file_path().ok()
}
