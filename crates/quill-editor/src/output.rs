//! Rendering of command output.

use std::borrow::Cow;
use std::path::Path;

use quill_syntax::SyntaxErrorInfo;

/// Lines of context shown on each side of an edit.
pub const SNIPPET_CONTEXT_WINDOW: usize = 4;

/// Appended to output cut at the character limit.
pub const CLIPPED_NOTICE: &str = "<response clipped><NOTE>To save on context only part of this file has been shown to you. You should retry this tool after you have searched inside the file with `grep -n` in order to find the line numbers of what you are looking for, then use `view_range` to see them.</NOTE>";

/// Cuts `content` after `max_chars` characters and appends the clip notice.
#[must_use]
pub fn truncate(content: &str, max_chars: usize) -> Cow<'_, str> {
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let kept = content.get(..cut).unwrap_or(content);
            Cow::Owned(format!("{kept}{CLIPPED_NOTICE}"))
        }
        None => Cow::Borrowed(content),
    }
}

/// Renders `content` the way `cat -n` would, numbering from `start_line`.
///
/// A single trailing line feed does not produce an extra numbered line.
#[must_use]
pub fn cat_n(content: &str, description: &str, start_line: usize, max_chars: usize) -> String {
    let clipped = truncate(content, max_chars);
    let body = clipped.strip_suffix('\n').unwrap_or(&clipped);

    let numbered: Vec<String> = body
        .split('\n')
        .enumerate()
        .map(|(offset, line)| format!("{:>6}\t{line}", start_line + offset))
        .collect();
    format!(
        "Here's the result of running `cat -n` on {description}:\n{}\n",
        numbered.join("\n")
    )
}

/// Wraps a snippet of an edited file in the standard edit confirmation.
#[must_use]
pub fn edit_confirmation(path: &Path, snippet: &str, lint: Option<&str>) -> String {
    let mut message = format!("The file {} has been edited. {snippet}", path.display());
    if let Some(report) = lint {
        message.push('\n');
        message.push_str(report);
        message.push('\n');
    }
    message.push_str(
        "Review the changes and make sure they are as expected. Edit the file again if necessary.",
    );
    message
}

/// Formats the syntax errors an edit introduced.
#[must_use]
pub fn lint_report(issues: &[SyntaxErrorInfo]) -> String {
    if issues.is_empty() {
        return "No linting issues found in the changes.".to_owned();
    }
    let lines: Vec<String> = issues
        .iter()
        .map(|issue| {
            format!(
                "- Line {}, Column {}: {}",
                issue.line, issue.column, issue.message
            )
        })
        .collect();
    format!("Linting issues found in the changes:\n{}\n", lines.join("\n"))
}
