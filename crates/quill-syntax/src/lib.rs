//! Tree-sitter support for the quill editor.
//!
//! The crate provides three services on top of bundled grammars for Rust,
//! Python, TypeScript and JavaScript:
//!
//! - [`Parser`] wraps a Tree-sitter parser and reports syntax errors with
//!   one-based positions.
//! - [`TagIndex`] extracts definition and reference [`Tag`]s from a file,
//!   caching results in an [`MtimeCache`] until the file's modification
//!   time changes.
//! - [`introduced_errors`] compares two versions of a file and reports the
//!   syntax errors the newer version adds.
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use quill_syntax::{TagIndex, TagKind};
//!
//! # fn main() -> Result<(), quill_syntax::SyntaxError> {
//! let mut index = TagIndex::new();
//! let definitions = index
//!     .tags(Path::new("/workspace/src/lib.rs"))?
//!     .into_iter()
//!     .filter(|tag| tag.kind == TagKind::Definition)
//!     .count();
//! # let _ = definitions;
//! # Ok(()) }
//! ```

mod cache;
mod error;
mod language;
mod lint;
mod parser;
mod tags;

pub use cache::MtimeCache;
pub use error::SyntaxError;
pub use language::SupportedLanguage;
pub use lint::introduced_errors;
pub use parser::{ParsedSource, Parser, SyntaxErrorInfo};
pub use tags::{Tag, TagIndex, TagKind};
