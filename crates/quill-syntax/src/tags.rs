//! Definition and reference tags extracted with Tree-sitter queries.
//!
//! Each bundled query labels identifier nodes with `name.definition.*` or
//! `name.reference.*` captures. Definition patterns also capture the whole
//! item as `definition.*`, and the tag's end line is widened to that item so
//! a definition spans its body rather than just its name.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;
use tree_sitter::{Query, QueryCursor, StreamingIterator};

use crate::cache::MtimeCache;
use crate::error::SyntaxError;
use crate::language::SupportedLanguage;
use crate::parser::Parser;

const TAGS_TARGET: &str = "quill_syntax::tags";

/// Whether a tag names a definition or a use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// The identifier is being defined.
    Definition,
    /// The identifier is being referenced.
    Reference,
}

/// A symbol occurrence. Lines and columns are zero-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    /// Definition or reference.
    pub kind: TagKind,
    /// Identifier text.
    pub name: String,
    /// Line of the identifier.
    pub start_line: usize,
    /// Byte column of the identifier.
    pub start_column: usize,
    /// Last line of the tagged item (the body end for definitions).
    pub end_line: usize,
}

struct LanguageTagger {
    parser: Parser,
    query: Query,
}

impl LanguageTagger {
    fn new(language: SupportedLanguage) -> Result<Self, SyntaxError> {
        let parser = Parser::new(language)?;
        let query = Query::new(&language.grammar(), language.tags_query())
            .map_err(|error| SyntaxError::query(language, error.to_string()))?;
        Ok(Self { parser, query })
    }

    fn extract(&mut self, source: &[u8]) -> Result<Vec<Tag>, SyntaxError> {
        let parsed = self.parser.parse(source)?;
        let names = self.query.capture_names();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.query, parsed.tree().root_node(), source);

        let mut tags = Vec::new();
        while let Some(found) = matches.next() {
            let mut body_end = None;
            let mut pending = Vec::new();
            for capture in found.captures {
                let Some(label) = names.get(capture.index as usize) else {
                    continue;
                };
                let kind = if label.starts_with("name.definition.") {
                    TagKind::Definition
                } else if label.starts_with("name.reference.") {
                    TagKind::Reference
                } else {
                    if label.starts_with("definition.") {
                        body_end = Some(capture.node.end_position().row);
                    }
                    continue;
                };
                let Ok(name) = capture.node.utf8_text(source) else {
                    continue;
                };
                let start = capture.node.start_position();
                pending.push(Tag {
                    kind,
                    name: name.to_owned(),
                    start_line: start.row,
                    start_column: start.column,
                    end_line: capture.node.end_position().row,
                });
            }
            for mut tag in pending {
                if let (TagKind::Definition, Some(end)) = (tag.kind, body_end) {
                    tag.end_line = tag.end_line.max(end);
                }
                tags.push(tag);
            }
        }
        tags.sort_by_key(|tag| (tag.start_line, tag.start_column));
        tags.dedup();
        Ok(tags)
    }
}

/// Per-file tag extraction with a modification-time cache.
///
/// Parsers and compiled queries are created on first use of each language.
#[derive(Default)]
pub struct TagIndex {
    taggers: HashMap<SupportedLanguage, LanguageTagger>,
    cache: MtimeCache<Vec<Tag>>,
}

impl TagIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the tags of the file at `path`.
    ///
    /// Files without a supported language and files that do not exist yield
    /// no tags. Cached tags are reused while the file's modification time is
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or its grammar or query
    /// cannot be loaded.
    pub fn tags(&mut self, path: &Path) -> Result<Vec<Tag>, SyntaxError> {
        let Some(language) = SupportedLanguage::from_path(path) else {
            return Ok(Vec::new());
        };
        let modified = match fs::metadata(path).and_then(|meta| meta.modified()) {
            Ok(modified) => modified,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(SyntaxError::io(path, error)),
        };

        if let Some(cached) = self.cache.get(path, modified) {
            return Ok(cached.clone());
        }

        let source = fs::read(path).map_err(|error| SyntaxError::io(path, error))?;
        let tagger = match self.taggers.entry(language) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(LanguageTagger::new(language)?),
        };
        let tags = tagger.extract(&source)?;
        debug!(
            target: TAGS_TARGET,
            path = %path.display(),
            %language,
            count = tags.len(),
            "extracted tags"
        );
        self.cache.put(path.to_path_buf(), modified, tags.clone());
        Ok(tags)
    }

    /// Drops the cached tags of `path`.
    pub fn invalidate(&mut self, path: &Path) {
        self.cache.invalidate(path);
    }

    /// Drops every cached entry.
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

impl std::fmt::Debug for TagIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagIndex")
            .field("cached_files", &self.cache.len())
            .finish_non_exhaustive()
    }
}
