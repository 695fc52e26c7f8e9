//! Symbol navigation collaborators.
//!
//! The dispatcher resolves a cursor from the first occurrence of `old_str`
//! and asks a [`Navigator`] for definitions, references or hover text. The
//! default navigator chains a language server with a tree-sitter tag search
//! (see [`ChainedNavigator`]).

mod chain;
mod lsp;
mod render;
mod tags;

use std::path::PathBuf;

use thiserror::Error;

pub use chain::ChainedNavigator;
pub use lsp::LspNavigator;
pub use render::{render_definitions, render_hover, render_references};
pub use tags::TagNavigator;

/// Cursor position handed to a navigator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationQuery {
    /// File containing the cursor.
    pub path: PathBuf,
    /// Zero-based line of the cursor.
    pub line: u32,
    /// Zero-based column of the cursor, in UTF-16 code units.
    pub column: u32,
    /// Text the cursor was resolved from.
    pub symbol: String,
    /// Decoded content of `path`, as the editor sees it.
    pub text: String,
}

/// A location reported by a navigator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolLocation {
    /// File containing the symbol.
    pub path: PathBuf,
    /// Zero-based start line.
    pub line: u32,
    /// Zero-based start column.
    pub column: u32,
    /// Zero-based last line of the symbol's body, when known.
    pub end_line: Option<u32>,
}

impl SymbolLocation {
    /// Location without a known body extent.
    #[must_use]
    pub const fn new(path: PathBuf, line: u32, column: u32) -> Self {
        Self {
            path,
            line,
            column,
            end_line: None,
        }
    }
}

/// Failures reported by navigators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// The navigator cannot serve this file; another one may.
    #[error("{message}")]
    Unavailable {
        /// Why the navigator is unavailable.
        message: String,
    },
    /// The navigator tried and failed.
    #[error("{message}")]
    Failed {
        /// Failure description.
        message: String,
    },
}

impl NavigationError {
    /// Builds a [`NavigationError::Unavailable`].
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Builds a [`NavigationError::Failed`].
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Whether a fallback navigator should be tried.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Answers navigation queries for the editor.
pub trait Navigator: Send {
    /// Locations where the symbol under the cursor is defined.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError`] when the lookup cannot be performed.
    fn definitions(
        &mut self,
        query: &NavigationQuery,
    ) -> Result<Vec<SymbolLocation>, NavigationError>;

    /// Locations where the symbol under the cursor is referenced.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError`] when the lookup cannot be performed.
    fn references(
        &mut self,
        query: &NavigationQuery,
    ) -> Result<Vec<SymbolLocation>, NavigationError>;

    /// Description of the symbol under the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError`] when the lookup cannot be performed.
    fn hover(&mut self, query: &NavigationQuery) -> Result<Option<String>, NavigationError>;
}

/// Finds the first occurrence of `needle` in `text` and returns its
/// zero-based line and UTF-16 column.
#[must_use]
pub fn locate(text: &str, needle: &str) -> Option<(u32, u32)> {
    if needle.is_empty() {
        return None;
    }
    let offset = text.find(needle)?;
    let before = text.get(..offset)?;
    let line_start = before.rfind('\n').map_or(0, |newline| newline + 1);
    let line = before.matches('\n').count();
    let column: usize = before
        .get(line_start..)?
        .chars()
        .map(char::len_utf16)
        .sum();
    Some((
        u32::try_from(line).unwrap_or(u32::MAX),
        u32::try_from(column).unwrap_or(u32::MAX),
    ))
}
