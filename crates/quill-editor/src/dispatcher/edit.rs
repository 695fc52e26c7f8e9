use std::fs;
use std::path::Path;

use tracing::info;

use super::{DISPATCH_TARGET, Editor, lint_edit};
use crate::encoding::TextEncoding;
use crate::error::EditorError;
use crate::file_ops::write_atomic;
use crate::history::Snapshot;
use crate::output::{SNIPPET_CONTEXT_WINDOW, cat_n, edit_confirmation};
use crate::request::{Command, EditRequest};
use crate::result::ToolResult;

/// File state captured before a mutation.
struct Before {
    bytes: Vec<u8>,
    text: Option<String>,
    encoding: TextEncoding,
}

impl Editor {
    pub(super) fn create(
        &mut self,
        path: &Path,
        file_text: Option<&str>,
    ) -> Result<ToolResult, EditorError> {
        let text = file_text.ok_or_else(|| EditorError::missing(Command::Create, "file_text"))?;
        let encoding = self.resolve_encoding(path)?;
        let bytes = encoding
            .encode(text)
            .map_err(|error| EditorError::encoding(path, error))?;
        let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        if size > self.max_file_size {
            return Err(EditorError::FileTooLarge {
                path: path.display().to_string(),
                size,
                limit: self.max_file_size,
            });
        }

        write_atomic(path, &bytes).map_err(|error| EditorError::from_file_ops(error, None))?;
        self.history.push(path, Snapshot::Absent);
        self.encodings.remember(path, encoding);
        info!(target: DISPATCH_TARGET, path = %path.display(), %encoding, "created file");

        Ok(ToolResult::success(format!(
            "File created successfully at: {}",
            path.display()
        ))
        .with_prev_exist(false)
        .with_contents(None, Some(text.to_owned())))
    }

    pub(super) fn str_replace(
        &mut self,
        path: &Path,
        request: &EditRequest,
    ) -> Result<ToolResult, EditorError> {
        let old = request
            .old_str
            .as_deref()
            .ok_or_else(|| EditorError::missing(Command::StrReplace, "old_str"))?;
        if old.is_empty() {
            return Err(EditorError::invalid(
                "old_str",
                "(empty)",
                "It must contain the text to replace.",
            ));
        }
        let new = request.new_str.as_deref().unwrap_or_default();
        if new == old {
            return Err(EditorError::IdenticalReplacement);
        }

        let before = self.capture(path)?;
        let found = self
            .files
            .replace_unique(path, before.encoding, old, new)
            .map_err(|error| EditorError::from_file_ops(error, Some(old)))?;
        let line_index = found.line.saturating_sub(1);
        let first = line_index.saturating_sub(SNIPPET_CONTEXT_WINDOW);
        let last = line_index + SNIPPET_CONTEXT_WINDOW + new.matches('\n').count();
        self.finish_edit(path, before, (first + 1, last + 1), request.enable_linting)
    }

    pub(super) fn insert(
        &mut self,
        path: &Path,
        request: &EditRequest,
    ) -> Result<ToolResult, EditorError> {
        let requested = request
            .insert_line
            .ok_or_else(|| EditorError::missing(Command::Insert, "insert_line"))?;
        let text = request
            .new_str
            .as_deref()
            .ok_or_else(|| EditorError::missing(Command::Insert, "new_str"))?;

        let before = self.capture(path)?;
        let total = self
            .files
            .count_lines(path, before.encoding)
            .map_err(|error| EditorError::from_file_ops(error, None))?;
        let line = usize::try_from(requested)
            .ok()
            .filter(|line| *line <= total)
            .ok_or_else(|| {
                EditorError::invalid(
                    "insert_line",
                    requested.to_string(),
                    format!("It should be within the range of lines of the file: [0, {total}]"),
                )
            })?;

        self.files
            .insert_after(path, before.encoding, line, text)
            .map_err(|error| EditorError::from_file_ops(error, None))?;
        let inserted = text.strip_suffix('\n').unwrap_or(text).split('\n').count();
        let first = line.saturating_sub(SNIPPET_CONTEXT_WINDOW).max(1);
        let last = (total + inserted).min(line + SNIPPET_CONTEXT_WINDOW + inserted);
        self.finish_edit(path, before, (first, last), request.enable_linting)
    }

    pub(super) fn undo_edit(&mut self, path: &Path) -> Result<ToolResult, EditorError> {
        let no_prior_edit = || EditorError::NoPriorEdit {
            path: path.display().to_string(),
        };
        if self.history.depth(path) == 0 {
            return Err(no_prior_edit());
        }
        let current = fs::read(path).map_err(|source| EditorError::io(path, source))?;
        let snapshot = self.history.pop(path).ok_or_else(no_prior_edit)?;

        let restored = match &snapshot {
            Snapshot::Absent => fs::remove_file(path).map_err(|source| EditorError::io(path, source)),
            Snapshot::Bytes(bytes) => {
                write_atomic(path, bytes).map_err(|error| EditorError::from_file_ops(error, None))
            }
        };
        if let Err(error) = restored {
            self.history.push(path, snapshot);
            return Err(error);
        }
        self.encodings.clear_cache(Some(path));
        info!(target: DISPATCH_TARGET, path = %path.display(), "undid last edit");

        let old_content = Some(String::from_utf8_lossy(&current).into_owned());
        let Snapshot::Bytes(bytes) = snapshot else {
            return Ok(ToolResult::success(format!(
                "Last edit to {} undone successfully. The file was removed.",
                path.display()
            ))
            .with_contents(old_content, None));
        };

        let encoding = self.resolve_encoding(path)?;
        let text = encoding
            .decode(&bytes)
            .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
        let rendered = cat_n(
            &text,
            &path.display().to_string(),
            1,
            self.max_output_chars,
        );
        Ok(ToolResult::success(format!(
            "Last edit to {} undone successfully. {rendered}",
            path.display()
        ))
        .with_contents(old_content, Some(text)))
    }

    /// Validates the target of a mutation and records its current state.
    fn capture(&mut self, path: &Path) -> Result<Before, EditorError> {
        let size = self.admit(path)?;
        let encoding = self.resolve_encoding(path)?;
        let text = self.full_text(path, encoding, size)?;
        let bytes = fs::read(path).map_err(|source| EditorError::io(path, source))?;
        Ok(Before {
            bytes,
            text,
            encoding,
        })
    }

    /// Records history for a completed mutation and renders its confirmation
    /// with the one-based inclusive `snippet` line range.
    fn finish_edit(
        &mut self,
        path: &Path,
        before: Before,
        snippet: (usize, usize),
        lint: bool,
    ) -> Result<ToolResult, EditorError> {
        self.history.push(path, Snapshot::Bytes(before.bytes));
        self.encodings.remember(path, before.encoding);
        info!(target: DISPATCH_TARGET, path = %path.display(), "edited file");

        let (first, last) = snippet;
        let excerpt = self
            .files
            .read_range(path, before.encoding, Some(first), Some(last))
            .map_err(|error| EditorError::from_file_ops(error, None))?;
        let rendered = cat_n(
            &excerpt,
            &format!("a snippet of {}", path.display()),
            first,
            self.max_output_chars,
        );

        let size = fs::metadata(path)
            .map_err(|source| EditorError::io(path, source))?
            .len();
        let after = self.full_text(path, before.encoding, size)?;
        let report = lint.then(|| lint_edit(path, before.text.as_deref(), after.as_deref()));
        Ok(
            ToolResult::success(edit_confirmation(path, &rendered, report.as_deref()))
                .with_contents(before.text, after),
        )
    }
}
