//! Text rendering of navigation answers.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::SymbolLocation;

/// Renders definition locations of `symbol`, each with its source lines.
#[must_use]
pub fn render_definitions(symbol: &str, locations: &[SymbolLocation]) -> String {
    if locations.is_empty() {
        return format!("No definitions found for `{symbol}`.");
    }
    render_list(&format!("Definition(s) of `{symbol}`:"), locations)
}

/// Renders reference locations of `symbol`, each with its source line.
#[must_use]
pub fn render_references(symbol: &str, locations: &[SymbolLocation]) -> String {
    if locations.is_empty() {
        return format!("No references found for `{symbol}`.");
    }
    render_list(&format!("References to `{symbol}`:"), locations)
}

/// Renders hover text for `symbol`.
#[must_use]
pub fn render_hover(symbol: &str, text: Option<&str>) -> String {
    match text.map(str::trim).filter(|body| !body.is_empty()) {
        Some(body) => format!("Hover information for `{symbol}`:\n{body}"),
        None => format!("No hover information found for `{symbol}`."),
    }
}

fn render_list(header: &str, locations: &[SymbolLocation]) -> String {
    let mut sources = SourceLines::default();
    let blocks: Vec<String> = locations
        .iter()
        .map(|location| sources.render(location))
        .collect();
    format!("{header}\n{}", blocks.join("\n"))
}

/// Lines of the files mentioned in one answer, read once each.
#[derive(Default)]
struct SourceLines {
    files: HashMap<PathBuf, Vec<String>>,
}

impl SourceLines {
    fn lines(&mut self, path: &Path) -> &[String] {
        self.files.entry(path.to_path_buf()).or_insert_with(|| {
            fs::read(path)
                .map(|bytes| {
                    String::from_utf8_lossy(&bytes)
                        .lines()
                        .map(str::to_owned)
                        .collect()
                })
                .unwrap_or_default()
        })
    }

    fn render(&mut self, location: &SymbolLocation) -> String {
        let mut block = format!(
            "{}:{}:{}",
            location.path.display(),
            location.line.saturating_add(1),
            location.column.saturating_add(1)
        );
        let first = usize::try_from(location.line).unwrap_or(usize::MAX);
        let last = location
            .end_line
            .and_then(|end| usize::try_from(end).ok())
            .unwrap_or(first)
            .max(first);
        let lines = self.lines(&location.path);
        for (index, text) in lines
            .iter()
            .enumerate()
            .skip(first)
            .take(last.saturating_sub(first).saturating_add(1))
        {
            block.push_str(&format!("\n{:>6}\t{text}", index.saturating_add(1)));
        }
        block
    }
}
