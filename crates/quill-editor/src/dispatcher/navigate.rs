use std::path::Path;

use tracing::debug;

use super::{DISPATCH_TARGET, Editor};
use crate::error::EditorError;
use crate::navigation::{
    NavigationError, NavigationQuery, locate, render_definitions, render_hover, render_references,
};
use crate::output::truncate;
use crate::request::Command;
use crate::result::ToolResult;

impl Editor {
    pub(super) fn navigate(
        &mut self,
        command: Command,
        path: &Path,
        old_str: Option<&str>,
    ) -> Result<ToolResult, EditorError> {
        let anchor = old_str.ok_or_else(|| EditorError::missing(command, "old_str"))?;
        if anchor.is_empty() {
            return Err(EditorError::invalid(
                "old_str",
                "(empty)",
                "It must contain the symbol to look up.",
            ));
        }

        self.admit(path)?;
        let encoding = self.resolve_encoding(path)?;
        let text = self
            .files
            .read_range(path, encoding, None, None)
            .map_err(|error| EditorError::from_file_ops(error, None))?;
        let (line, column) = locate(&text, anchor).ok_or_else(|| {
            EditorError::invalid(
                "old_str",
                anchor,
                format!("It does not appear verbatim in {}.", path.display()),
            )
        })?;

        let _session = self
            .gate
            .acquire()
            .map_err(|_| EditorError::ConcurrentSessionConflict)?;
        let symbol = anchor.trim();
        let query = NavigationQuery {
            path: path.to_path_buf(),
            line,
            column,
            symbol: symbol.to_owned(),
            text,
        };
        debug!(
            target: DISPATCH_TARGET,
            %command,
            path = %path.display(),
            line,
            column,
            "navigating"
        );

        let failed = |error: NavigationError| EditorError::navigation(error.to_string());
        let output = match command {
            Command::JumpToDefinition => {
                render_definitions(symbol, &self.navigator.definitions(&query).map_err(failed)?)
            }
            Command::FindReferences => {
                render_references(symbol, &self.navigator.references(&query).map_err(failed)?)
            }
            _ => render_hover(
                symbol,
                self.navigator.hover(&query).map_err(failed)?.as_deref(),
            ),
        };
        Ok(ToolResult::success(truncate(&output, self.max_output_chars)))
    }
}
