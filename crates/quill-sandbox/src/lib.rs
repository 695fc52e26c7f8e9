//! Workspace containment for quill file operations.
//!
//! The `quill-sandbox` crate confines every path the editor touches to a
//! single workspace directory. Callers construct a [`WorkspaceBoundary`]
//! once and pass each incoming path through [`WorkspaceBoundary::authorize`]
//! before reading or writing it. Authorisation resolves symbolic links and
//! `..` segments, so neither a relative escape nor an in-workspace symlink
//! pointing elsewhere can reach outside the boundary.
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use quill_sandbox::WorkspaceBoundary;
//!
//! # fn main() -> Result<(), quill_sandbox::SandboxError> {
//! let boundary = WorkspaceBoundary::new("/workspace")?;
//! let path = boundary.authorize(Path::new("/workspace/src/main.rs"))?;
//! assert!(path.starts_with("/workspace"));
//! # Ok(()) }
//! ```
//!
//! A boundary built with [`WorkspaceBoundary::unrestricted`] still returns
//! canonical paths but never rejects one.

mod boundary;
mod error;

pub use boundary::WorkspaceBoundary;
pub use error::SandboxError;
