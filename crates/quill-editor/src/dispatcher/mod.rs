//! Command dispatch for the editor.
//!
//! [`Editor`] owns the per-process state (encoding cache, undo history and
//! the navigation session gate) and runs one [`EditRequest`] at a time. Every
//! request passes through the same pipeline: the path is checked for being
//! absolute, authorised against the workspace boundary, and matched against
//! the command (existing file, missing file or directory) before the command
//! itself touches the filesystem.

mod edit;
mod navigate;
mod view;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use quill_config::{Config, DEFAULT_MAX_OUTPUT_CHARS};
use quill_lsp_host::SessionGate;
use quill_sandbox::{SandboxError, WorkspaceBoundary};
use quill_syntax::introduced_errors;
use tracing::{debug, warn};

use crate::encoding::{EncodingManager, TextEncoding};
use crate::error::EditorError;
use crate::file_ops::{LargeFileOps, MAX_FILE_SIZE, MAX_FULL_READ_SIZE};
use crate::history::EditHistory;
use crate::navigation::{ChainedNavigator, Navigator};
use crate::output::lint_report;
use crate::request::{Command, EditRequest};
use crate::result::ToolResult;

/// Tracing target for dispatcher events.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatcher");

/// The file-editing engine.
///
/// State is scoped to the instance: encodings and undo history survive
/// between calls on the same editor and are lost when it is dropped.
pub struct Editor {
    boundary: WorkspaceBoundary,
    encodings: EncodingManager,
    files: LargeFileOps,
    history: EditHistory,
    navigator: Box<dyn Navigator>,
    gate: SessionGate,
    max_file_size: u64,
    max_output_chars: usize,
}

impl Editor {
    /// Builds an editor confined to `boundary` that answers navigation
    /// commands through `navigator`.
    #[must_use]
    pub fn new(boundary: WorkspaceBoundary, navigator: Box<dyn Navigator>) -> Self {
        Self {
            boundary,
            encodings: EncodingManager::new(),
            files: LargeFileOps::new(),
            history: EditHistory::new(),
            navigator,
            gate: SessionGate::new(),
            max_file_size: MAX_FILE_SIZE,
            max_output_chars: DEFAULT_MAX_OUTPUT_CHARS,
        }
    }

    /// Builds an editor from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError`] when the configured workspace root cannot
    /// anchor a boundary.
    pub fn from_config(config: &Config) -> Result<Self, SandboxError> {
        let boundary = match config.workspace_root() {
            Some(root) => WorkspaceBoundary::new(root.as_std_path())?,
            None => WorkspaceBoundary::unrestricted(),
        };
        let navigator =
            ChainedNavigator::for_backend(config.navigation_backend(), boundary.root());
        Ok(Self::new(boundary, Box::new(navigator))
            .with_limits(config.max_file_size_bytes(), config.max_output_chars()))
    }

    /// Sets the largest accepted file size (bytes, clamped to 1 GiB) and the
    /// output clipping threshold (characters).
    #[must_use]
    pub fn with_limits(mut self, max_file_size: u64, max_output_chars: usize) -> Self {
        self.max_file_size = max_file_size.min(MAX_FILE_SIZE);
        self.max_output_chars = max_output_chars;
        self
    }

    /// Replaces the navigation collaborator.
    #[must_use]
    pub fn with_navigator(mut self, navigator: Box<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    /// Gate guarding the single navigation session of this editor.
    #[must_use]
    pub const fn session_gate(&self) -> &SessionGate {
        &self.gate
    }

    /// Pins the encoding used for `path` until its cache entry is cleared.
    pub fn set_encoding(&mut self, path: &Path, encoding: TextEncoding) {
        self.encodings.set_encoding(path, encoding);
    }

    /// Drops cached encodings for `path`, or for every file.
    pub fn clear_encoding_cache(&mut self, path: Option<&Path>) {
        self.encodings.clear_cache(path);
    }

    /// Runs `request`, folding any failure into the returned result.
    pub fn execute(&mut self, request: &EditRequest) -> ToolResult {
        match self.try_execute(request) {
            Ok(result) => result,
            Err(error) => {
                debug!(
                    target: DISPATCH_TARGET,
                    command = %request.command,
                    path = %request.path.display(),
                    kind = error.kind(),
                    %error,
                    "command failed"
                );
                ToolResult::failure(&error).with_path(request.path.display().to_string())
            }
        }
    }

    /// Runs `request`.
    ///
    /// # Errors
    ///
    /// Returns the [`EditorError`] describing why the command was rejected.
    /// A failed command leaves the filesystem and history unchanged.
    pub fn try_execute(&mut self, request: &EditRequest) -> Result<ToolResult, EditorError> {
        let path = self.validate_path(request.command, &request.path)?;
        debug!(
            target: DISPATCH_TARGET,
            command = %request.command,
            path = %path.display(),
            "dispatching command"
        );
        let result = match request.command {
            Command::View => self.view(&path, request.view_range.as_deref())?,
            Command::Create => self.create(&path, request.file_text.as_deref())?,
            Command::StrReplace => self.str_replace(&path, request)?,
            Command::Insert => self.insert(&path, request)?,
            Command::UndoEdit => self.undo_edit(&path)?,
            Command::JumpToDefinition | Command::FindReferences | Command::Hover => {
                self.navigate(request.command, &path, request.old_str.as_deref())?
            }
        };
        Ok(result.with_path(path.display().to_string()))
    }

    fn validate_path(&self, command: Command, path: &Path) -> Result<PathBuf, EditorError> {
        if !path.is_absolute() {
            let base = self
                .boundary
                .root()
                .map(Path::to_path_buf)
                .or_else(|| env::current_dir().ok())
                .unwrap_or_else(|| PathBuf::from("/"));
            return Err(EditorError::invalid(
                "path",
                path.display().to_string(),
                format!(
                    "The path should be an absolute path, starting with `/`. Maybe you meant {}?",
                    base.join(path).display()
                ),
            ));
        }

        let resolved = self
            .boundary
            .authorize(path)
            .map_err(|error| EditorError::from_sandbox(path, error))?;

        let metadata = fs::metadata(&resolved).ok();
        match (command, metadata) {
            (Command::Create, Some(_)) => Err(EditorError::invalid(
                "path",
                path.display().to_string(),
                format!(
                    "File already exists at: {}. Cannot overwrite files using command `create`.",
                    path.display()
                ),
            )),
            (Command::Create, None) => Ok(resolved),
            (_, None) => Err(EditorError::FileNotFound {
                path: path.display().to_string(),
            }),
            (Command::View, Some(_)) => Ok(resolved),
            (_, Some(found)) if found.is_dir() => Err(EditorError::invalid(
                "path",
                path.display().to_string(),
                format!(
                    "The path {} is a directory and only the `view` command can be used on directories.",
                    path.display()
                ),
            )),
            (_, Some(_)) => Ok(resolved),
        }
    }

    /// Validates `path` as an editable text file within the configured size
    /// limit and returns its size.
    fn admit(&self, path: &Path) -> Result<u64, EditorError> {
        let size = self
            .files
            .validate(path)
            .map_err(|error| EditorError::from_file_ops(error, None))?;
        if size > self.max_file_size {
            return Err(EditorError::FileTooLarge {
                path: path.display().to_string(),
                size,
                limit: self.max_file_size,
            });
        }
        Ok(size)
    }

    fn resolve_encoding(&mut self, path: &Path) -> Result<TextEncoding, EditorError> {
        self.encodings
            .resolve(path)
            .map_err(|error| EditorError::encoding(path, error))
    }

    /// Whole decoded content of a file small enough to hold in memory.
    fn full_text(
        &self,
        path: &Path,
        encoding: TextEncoding,
        size: u64,
    ) -> Result<Option<String>, EditorError> {
        if size > MAX_FULL_READ_SIZE {
            return Ok(None);
        }
        self.files
            .read_range(path, encoding, None, None)
            .map(Some)
            .map_err(|error| EditorError::from_file_ops(error, None))
    }
}

/// Syntax check of an edit, rendered for the edit confirmation.
fn lint_edit(path: &Path, before: Option<&str>, after: Option<&str>) -> String {
    let unavailable = || format!("Linting is not available for {}.", path.display());
    let (Some(old), Some(new)) = (before, after) else {
        return unavailable();
    };
    match introduced_errors(path, old, new) {
        Ok(Some(issues)) => lint_report(&issues),
        Ok(None) => unavailable(),
        Err(error) => {
            warn!(target: DISPATCH_TARGET, path = %path.display(), %error, "lint failed");
            unavailable()
        }
    }
}
