//! Error taxonomy surfaced by the editor.
//!
//! Every failure a command can produce is folded into [`EditorError`]. The
//! dispatcher converts errors into a [`crate::ToolResult`] so callers never
//! see a panic or a raw I/O error.

use std::io;
use std::path::Path;

use strum::IntoStaticStr;
use thiserror::Error;

use quill_sandbox::SandboxError;

use crate::encoding::EncodingError;
use crate::file_ops::FileOpsError;
use crate::request::Command;

/// Errors returned by [`crate::Editor::try_execute`].
#[derive(Debug, Error, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum EditorError {
    /// A parameter the command needs was not supplied.
    #[error("Parameter `{parameter}` is required for command: {command}.")]
    ParameterMissing {
        /// Command being executed.
        command: Command,
        /// Name of the missing parameter.
        parameter: &'static str,
    },

    /// A parameter was supplied but cannot be used.
    #[error("Invalid `{parameter}` parameter: {value}. {hint}")]
    ParameterInvalid {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Rendered value the caller supplied.
        value: String,
        /// What the caller should do instead.
        hint: String,
    },

    /// The path lies outside the workspace boundary.
    #[error("File access not permitted: {path}. You can only access paths inside the workspace.")]
    AccessDenied {
        /// Path as supplied by the caller.
        path: String,
    },

    /// The path does not exist.
    #[error("The path {path} does not exist. Please provide a valid path.")]
    FileNotFound {
        /// Missing path.
        path: String,
    },

    /// The file exceeds the configured size limit.
    #[error("File {path} is too large ({size} bytes). Maximum allowed size is {limit} bytes.")]
    FileTooLarge {
        /// Offending file.
        path: String,
        /// Size of the file in bytes.
        size: u64,
        /// Limit in bytes.
        limit: u64,
    },

    /// The file does not look like text.
    #[error("File {path} appears to be binary. Only text files can be edited.")]
    InvalidFileType {
        /// Offending file.
        path: String,
    },

    /// `old_str` does not occur in the file.
    #[error("No replacement was performed, old_str `{old}` did not appear verbatim in {path}.")]
    NoMatch {
        /// Text that was searched for.
        old: String,
        /// File that was searched.
        path: String,
    },

    /// `new_str` equals `old_str`, so the edit would change nothing.
    #[error("No replacement was performed. `new_str` and `old_str` must be different.")]
    IdenticalReplacement,

    /// `old_str` occurs more than once.
    #[error(
        "No replacement was performed. Multiple occurrences of old_str `{old}` in lines {lines:?}. Please ensure it is unique."
    )]
    AmbiguousMatch {
        /// Text that was searched for.
        old: String,
        /// One-based line numbers of every occurrence.
        lines: Vec<usize>,
    },

    /// Undo was requested for a file without recorded edits.
    #[error("No edit history found for {path}.")]
    NoPriorEdit {
        /// File without history.
        path: String,
    },

    /// A navigation session is already in progress.
    #[error("A navigation session is already active. Retry once it has finished.")]
    ConcurrentSessionConflict,

    /// The file content could not be decoded or encoded.
    #[error("Ran into an encoding problem with {path}: {source}")]
    Encoding {
        /// File being processed.
        path: String,
        /// Underlying encoding failure.
        #[source]
        source: EncodingError,
    },

    /// The navigation collaborator failed.
    #[error("Navigation failed: {message}")]
    Navigation {
        /// Description of the failure.
        message: String,
    },

    /// A file system operation failed.
    #[error("Ran into {source} while trying to access {path}")]
    Io {
        /// Path being accessed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl EditorError {
    /// Stable snake_case identifier of the error kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    pub(crate) const fn missing(command: Command, parameter: &'static str) -> Self {
        Self::ParameterMissing { command, parameter }
    }

    pub(crate) fn invalid(
        parameter: &'static str,
        value: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::ParameterInvalid {
            parameter,
            value: value.into(),
            hint: hint.into(),
        }
    }

    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn encoding(path: &Path, source: EncodingError) -> Self {
        Self::Encoding {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn navigation(message: impl Into<String>) -> Self {
        Self::Navigation {
            message: message.into(),
        }
    }

    /// Maps a sandbox rejection of `path`.
    ///
    /// Containment violations become [`EditorError::AccessDenied`]; paths
    /// that cannot be resolved at all surface as I/O failures.
    pub(crate) fn from_sandbox(path: &Path, error: SandboxError) -> Self {
        match error {
            SandboxError::CanonicalisationFailed { source, .. } => Self::io(path, source),
            _ => Self::AccessDenied {
                path: path.display().to_string(),
            },
        }
    }

    /// Maps a file operation failure, naming the searched text when relevant.
    pub(crate) fn from_file_ops(error: FileOpsError, old: Option<&str>) -> Self {
        let searched = || old.unwrap_or_default().to_owned();
        match error {
            FileOpsError::NotFound { path } => Self::FileNotFound {
                path: path.display().to_string(),
            },
            FileOpsError::TooLarge { path, size, limit } => Self::FileTooLarge {
                path: path.display().to_string(),
                size,
                limit,
            },
            FileOpsError::InvalidFileType { path } => Self::InvalidFileType {
                path: path.display().to_string(),
            },
            FileOpsError::NoMatch { path } => Self::NoMatch {
                old: searched(),
                path: path.display().to_string(),
            },
            FileOpsError::Ambiguous { lines, .. } => Self::AmbiguousMatch {
                old: searched(),
                lines,
            },
            FileOpsError::LineOutOfRange { line, total, .. } => Self::invalid(
                "insert_line",
                line.to_string(),
                format!("It should be within the range of lines of the file: [0, {total}]"),
            ),
            FileOpsError::Decode { path, source } => Self::encoding(&path, source),
            FileOpsError::Io { path, source } => Self::io(&path, source),
        }
    }
}
