//! Navigation backed by tree-sitter tags.

use std::path::{Path, PathBuf};

use quill_syntax::{SupportedLanguage, TagIndex, TagKind};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use super::{NavigationError, NavigationQuery, Navigator, SymbolLocation};

const TAGS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::navigation::tags");

/// Searches definition and reference tags of every supported source file
/// under a root directory.
///
/// Without a configured root the directory of the queried file is searched.
#[derive(Default)]
pub struct TagNavigator {
    index: TagIndex,
    root: Option<PathBuf>,
}

impl TagNavigator {
    /// Creates a navigator searching `root`, or the queried file's directory
    /// when `root` is `None`.
    #[must_use]
    pub fn new(root: Option<PathBuf>) -> Self {
        Self {
            index: TagIndex::new(),
            root,
        }
    }

    fn search_root<'query>(&'query self, query: &'query NavigationQuery) -> &'query Path {
        self.root
            .as_deref()
            .or_else(|| query.path.parent())
            .unwrap_or(&query.path)
    }

    fn search(
        &mut self,
        query: &NavigationQuery,
        kind: TagKind,
    ) -> Result<Vec<SymbolLocation>, NavigationError> {
        let symbol = query.symbol.trim();
        if symbol.is_empty() {
            return Ok(Vec::new());
        }

        let root = self.search_root(query).to_path_buf();
        let mut locations = Vec::new();
        for path in source_files(&root) {
            let tags = match self.index.tags(&path) {
                Ok(tags) => tags,
                Err(error) => {
                    debug!(target: TAGS_TARGET, path = %path.display(), %error, "skipping file");
                    continue;
                }
            };
            locations.extend(
                tags.into_iter()
                    .filter(|tag| tag.kind == kind && tag.name == symbol)
                    .map(|tag| SymbolLocation {
                        path: path.clone(),
                        line: to_u32(tag.start_line),
                        column: to_u32(tag.start_column),
                        end_line: (kind == TagKind::Definition).then(|| to_u32(tag.end_line)),
                    }),
            );
        }
        debug!(
            target: TAGS_TARGET,
            symbol,
            root = %root.display(),
            found = locations.len(),
            "tag search finished"
        );
        Ok(locations)
    }
}

impl Navigator for TagNavigator {
    fn definitions(
        &mut self,
        query: &NavigationQuery,
    ) -> Result<Vec<SymbolLocation>, NavigationError> {
        self.search(query, TagKind::Definition)
    }

    fn references(
        &mut self,
        query: &NavigationQuery,
    ) -> Result<Vec<SymbolLocation>, NavigationError> {
        self.search(query, TagKind::Reference)
    }

    fn hover(&mut self, _query: &NavigationQuery) -> Result<Option<String>, NavigationError> {
        Err(NavigationError::unavailable(
            "hover information requires a language server",
        ))
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn source_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry))
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(DirEntry::into_path)
        .filter(|path| SupportedLanguage::from_path(path).is_some())
        .collect();
    files.sort();
    files
}
