//! Canonical containment checks against a workspace root.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::SandboxError;

const SANDBOX_TARGET: &str = "quill_sandbox";

/// Directory boundary that every editor path must resolve inside.
///
/// The root is canonicalised once at construction and never changes. An
/// unrestricted boundary performs the same resolution but accepts every
/// absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkspaceBoundary {
    root: Option<PathBuf>,
}

impl WorkspaceBoundary {
    /// Builds a boundary anchored at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::MissingRoot`] when the directory does not
    /// exist, [`SandboxError::RootNotDirectory`] when it names a file, and
    /// [`SandboxError::CanonicalisationFailed`] when it cannot be resolved.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, SandboxError> {
        let supplied = root.as_ref();
        if fs::symlink_metadata(supplied).is_err() {
            return Err(SandboxError::MissingRoot {
                path: supplied.to_path_buf(),
            });
        }

        let canonical = canonicalise(supplied)?;
        if !canonical.is_dir() {
            return Err(SandboxError::RootNotDirectory {
                path: supplied.to_path_buf(),
            });
        }

        Ok(Self {
            root: Some(canonical),
        })
    }

    /// Builds a boundary that accepts every absolute path.
    #[must_use]
    pub const fn unrestricted() -> Self {
        Self { root: None }
    }

    /// Canonical workspace root, if the boundary is restricted.
    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Resolves `path` and confirms it sits at or below the workspace root.
    ///
    /// The returned path is absolute with symbolic links and `.`/`..`
    /// segments resolved. Paths whose trailing components do not exist yet
    /// (for example a file about to be created) are resolved through their
    /// deepest existing ancestor.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::RelativePath`] for relative input,
    /// [`SandboxError::OutsideWorkspace`] when the resolved path escapes the
    /// root, and [`SandboxError::CanonicalisationFailed`] when resolution
    /// fails (for example through a dangling symbolic link).
    pub fn authorize(&self, path: &Path) -> Result<PathBuf, SandboxError> {
        if !path.is_absolute() {
            return Err(SandboxError::RelativePath {
                path: path.to_path_buf(),
            });
        }

        let resolved = resolve(path)?;
        match &self.root {
            Some(root) if !resolved.starts_with(root) => {
                debug!(
                    target: SANDBOX_TARGET,
                    requested = %path.display(),
                    resolved = %resolved.display(),
                    root = %root.display(),
                    "rejected path outside workspace"
                );
                Err(SandboxError::OutsideWorkspace {
                    path: path.to_path_buf(),
                    resolved,
                })
            }
            _ => Ok(resolved),
        }
    }
}

/// Resolves `path` one component at a time.
///
/// Every component that exists is canonicalised as soon as it is reached, so
/// a `..` that climbs out of a missing directory back into existing ones
/// cannot smuggle a symbolic link past the check. `..` is only ever applied
/// to a path that is canonical up to its missing tail.
fn resolve(path: &Path) -> Result<PathBuf, SandboxError> {
    let mut resolved = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(name) => {
                let candidate = resolved.join(name);
                resolved = if fs::symlink_metadata(&candidate).is_ok() {
                    canonicalise(&candidate)?
                } else {
                    candidate
                };
            }
        }
    }
    Ok(resolved)
}

fn canonicalise(path: &Path) -> Result<PathBuf, SandboxError> {
    fs::canonicalize(path).map_err(|source| SandboxError::CanonicalisationFailed {
        path: path.to_path_buf(),
        source,
    })
}
