//! Structured command results.

use serde::{Deserialize, Serialize};

use crate::error::EditorError;

/// Outcome of one editor command.
///
/// Exactly one of `output` and `error` is set. Mutating commands also carry
/// the file content before and after the change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Rendered success output.
    pub output: Option<String>,
    /// Rendered error message.
    pub error: Option<String>,
    /// Path the command operated on.
    pub path: Option<String>,
    /// Whether the path existed before the command ran.
    pub prev_exist: bool,
    /// Content before a mutation.
    pub old_content: Option<String>,
    /// Content after a mutation.
    pub new_content: Option<String>,
}

impl ToolResult {
    /// Successful result carrying `output`.
    #[must_use]
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: Some(output.into()),
            prev_exist: true,
            ..Self::default()
        }
    }

    /// Failed result carrying the rendered error.
    #[must_use]
    pub fn failure(error: &EditorError) -> Self {
        Self {
            error: Some(error.to_string()),
            prev_exist: true,
            ..Self::default()
        }
    }

    /// Sets the path the command operated on.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Records whether the path existed beforehand.
    #[must_use]
    pub const fn with_prev_exist(mut self, existed: bool) -> Self {
        self.prev_exist = existed;
        self
    }

    /// Records the content before and after a mutation.
    #[must_use]
    pub fn with_contents(mut self, old: Option<String>, new: Option<String>) -> Self {
        self.old_content = old;
        self.new_content = new;
        self
    }

    /// Whether the command failed.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// The text shown to an agent: the output, or the error prefixed with
    /// `ERROR:`.
    #[must_use]
    pub fn formatted_output_and_error(&self) -> String {
        match (&self.error, &self.output) {
            (Some(error), _) => format!("ERROR:\n{error}"),
            (None, Some(output)) => output.clone(),
            (None, None) => String::new(),
        }
    }
}
