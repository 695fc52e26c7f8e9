//! Typed editor requests.
//!
//! A request names one [`Command`] and carries the optional parameters that
//! command consumes. Parameters are kept loosely typed (signed integers,
//! optional strings) so the dispatcher can report precise validation errors
//! instead of failing at deserialisation time.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr, VariantNames};

/// Commands understood by the editor.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Command {
    /// Show a file with line numbers, or list a directory.
    View,
    /// Create a new file.
    Create,
    /// Replace the single occurrence of `old_str` with `new_str`.
    StrReplace,
    /// Insert `new_str` after line `insert_line`.
    Insert,
    /// Revert the most recent mutation of a file.
    UndoEdit,
    /// Locate the definition of the symbol at `old_str`.
    JumpToDefinition,
    /// Locate references to the symbol at `old_str`.
    FindReferences,
    /// Describe the symbol at `old_str`.
    Hover,
}

impl Command {
    /// Whether the command writes to the file system.
    #[must_use]
    pub const fn is_mutation(self) -> bool {
        matches!(
            self,
            Self::Create | Self::StrReplace | Self::Insert | Self::UndoEdit
        )
    }

    /// Whether the command is answered by the navigation collaborator.
    #[must_use]
    pub const fn is_navigation(self) -> bool {
        matches!(
            self,
            Self::JumpToDefinition | Self::FindReferences | Self::Hover
        )
    }
}

/// One editor invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRequest {
    /// Command to run.
    pub command: Command,
    /// Absolute path of the file or directory.
    pub path: PathBuf,
    /// Content of the file to create.
    #[serde(default)]
    pub file_text: Option<String>,
    /// `[start, end]` line range for `view`; `end == -1` reads to the end.
    #[serde(default)]
    pub view_range: Option<Vec<i64>>,
    /// Text to replace, or the symbol anchor for navigation commands.
    #[serde(default)]
    pub old_str: Option<String>,
    /// Replacement or inserted text.
    #[serde(default)]
    pub new_str: Option<String>,
    /// Line after which `new_str` is inserted; `0` inserts at the top.
    #[serde(default)]
    pub insert_line: Option<i64>,
    /// Report syntax errors introduced by the edit.
    #[serde(default)]
    pub enable_linting: bool,
}

impl EditRequest {
    /// Builds a request with no optional parameters.
    #[must_use]
    pub fn new(command: Command, path: impl Into<PathBuf>) -> Self {
        Self {
            command,
            path: path.into(),
            file_text: None,
            view_range: None,
            old_str: None,
            new_str: None,
            insert_line: None,
            enable_linting: false,
        }
    }

    /// Sets `file_text`.
    #[must_use]
    pub fn with_file_text(mut self, text: impl Into<String>) -> Self {
        self.file_text = Some(text.into());
        self
    }

    /// Sets `view_range`.
    #[must_use]
    pub fn with_view_range(mut self, range: Vec<i64>) -> Self {
        self.view_range = Some(range);
        self
    }

    /// Sets `old_str`.
    #[must_use]
    pub fn with_old_str(mut self, text: impl Into<String>) -> Self {
        self.old_str = Some(text.into());
        self
    }

    /// Sets `new_str`.
    #[must_use]
    pub fn with_new_str(mut self, text: impl Into<String>) -> Self {
        self.new_str = Some(text.into());
        self
    }

    /// Sets `insert_line`.
    #[must_use]
    pub const fn with_insert_line(mut self, line: i64) -> Self {
        self.insert_line = Some(line);
        self
    }

    /// Enables the syntax lint report.
    #[must_use]
    pub const fn with_linting(mut self, enabled: bool) -> Self {
        self.enable_linting = enabled;
        self
    }
}
