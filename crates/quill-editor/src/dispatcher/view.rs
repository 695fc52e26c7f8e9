use std::path::Path;

use super::Editor;
use crate::error::EditorError;
use crate::listing::list_directory;
use crate::output::{cat_n, truncate};
use crate::result::ToolResult;

/// A validated `view_range`, one-based and inclusive.
struct LineRange {
    start: usize,
    end: Option<usize>,
}

impl Editor {
    pub(super) fn view(
        &mut self,
        path: &Path,
        view_range: Option<&[i64]>,
    ) -> Result<ToolResult, EditorError> {
        if path.is_dir() {
            if let Some(range) = view_range {
                return Err(EditorError::invalid(
                    "view_range",
                    render_range(range),
                    "The `view_range` parameter is not allowed when `path` points to a directory.",
                ));
            }
            let listing = list_directory(path)?;
            return Ok(ToolResult::success(truncate(
                &listing,
                self.max_output_chars,
            )));
        }

        self.admit(path)?;
        let encoding = self.resolve_encoding(path)?;
        let description = format!("{} (encoding: {encoding})", path.display());

        let Some(range) = view_range else {
            let content = self
                .files
                .read_range(path, encoding, None, None)
                .map_err(|error| EditorError::from_file_ops(error, None))?;
            return Ok(ToolResult::success(cat_n(
                &content,
                &description,
                1,
                self.max_output_chars,
            )));
        };

        let total = self
            .files
            .count_lines(path, encoding)
            .map_err(|error| EditorError::from_file_ops(error, None))?;
        let lines = check_range(range, total)?;
        let content = self
            .files
            .read_range(path, encoding, Some(lines.start), lines.end)
            .map_err(|error| EditorError::from_file_ops(error, None))?;
        Ok(ToolResult::success(cat_n(
            &content,
            &description,
            lines.start,
            self.max_output_chars,
        )))
    }
}

fn render_range(range: &[i64]) -> String {
    let parts: Vec<String> = range.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(", "))
}

fn check_range(range: &[i64], total: usize) -> Result<LineRange, EditorError> {
    let invalid = |hint: String| EditorError::invalid("view_range", render_range(range), hint);
    let &[start, end] = range else {
        return Err(invalid("It should be a list of two integers.".to_owned()));
    };

    let first = usize::try_from(start)
        .ok()
        .filter(|line| (1..=total).contains(line))
        .ok_or_else(|| {
            invalid(format!(
                "Its first element `{start}` should be within the range of lines of the file: [1, {total}]."
            ))
        })?;

    if end == -1 {
        return Ok(LineRange {
            start: first,
            end: None,
        });
    }
    let last = usize::try_from(end).map_err(|_| {
        invalid(format!(
            "Its second element `{end}` should be `-1` or a line number of the file."
        ))
    })?;
    if last > total {
        return Err(invalid(format!(
            "Its second element `{end}` should be smaller than the number of lines in the file: `{total}`."
        )));
    }
    if last < first {
        return Err(invalid(format!(
            "Its second element `{end}` should be larger or equal than its first `{start}`."
        )));
    }
    Ok(LineRange {
        start: first,
        end: Some(last),
    })
}
