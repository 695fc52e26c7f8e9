//! Syntax checks for edited files.

use std::collections::HashMap;
use std::path::Path;

use crate::error::SyntaxError;
use crate::language::SupportedLanguage;
use crate::parser::{Parser, SyntaxErrorInfo};

/// Reports syntax errors present in `after` that were not already in `before`.
///
/// Errors are compared by message, so an error that only moved because lines
/// were inserted above it is not reported again. Returns `None` when `path`
/// has no supported grammar.
///
/// # Errors
///
/// Returns an error when the grammar cannot be loaded or parsing fails.
pub fn introduced_errors(
    path: &Path,
    before: &str,
    after: &str,
) -> Result<Option<Vec<SyntaxErrorInfo>>, SyntaxError> {
    let Some(language) = SupportedLanguage::from_path(path) else {
        return Ok(None);
    };
    let mut parser = Parser::new(language)?;

    let mut existing: HashMap<String, usize> = HashMap::new();
    for error in parser.parse(before.as_bytes())?.errors() {
        *existing.entry(error.message).or_default() += 1;
    }

    let introduced = parser
        .parse(after.as_bytes())?
        .errors()
        .into_iter()
        .filter(|error| match existing.get_mut(&error.message) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                false
            }
            _ => true,
        })
        .collect();
    Ok(Some(introduced))
}
