//! Domain errors raised by the workspace boundary.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving or authorising a path.
#[derive(Debug, Error)]
pub enum SandboxError {
    /// The workspace root does not exist and therefore cannot anchor a boundary.
    #[error("workspace root {} does not exist", path.display())]
    MissingRoot {
        /// Root supplied by the caller.
        path: PathBuf,
    },

    /// The workspace root exists but is not a directory.
    #[error("workspace root {} is not a directory", path.display())]
    RootNotDirectory {
        /// Root supplied by the caller.
        path: PathBuf,
    },

    /// Paths must be absolute before they are authorised.
    #[error("path {} is not absolute", path.display())]
    RelativePath {
        /// Offending path.
        path: PathBuf,
    },

    /// The resolved path falls outside the workspace root.
    #[error("path {} resolves outside the workspace", path.display())]
    OutsideWorkspace {
        /// Path as supplied by the caller.
        path: PathBuf,
        /// Canonical form that failed the containment check.
        resolved: PathBuf,
    },

    /// Canonicalisation of a path failed.
    #[error("failed to canonicalise {}: {source}", path.display())]
    CanonicalisationFailed {
        /// Path that could not be resolved.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
    },
}

impl SandboxError {
    /// Whether the error reports a containment violation rather than a
    /// resolution failure.
    #[must_use]
    pub const fn is_violation(&self) -> bool {
        matches!(self, Self::OutsideWorkspace { .. })
    }
}
