//! Tree-sitter parser wrapper.
//!
//! Tree-sitter recovers from malformed input, so a successful parse may still
//! contain `ERROR` or `MISSING` nodes. [`ParsedSource::errors`] reports them
//! with one-based coordinates for display.

use crate::error::SyntaxError;
use crate::language::SupportedLanguage;

/// Longest error context rendered before it is elided.
const CONTEXT_LIMIT: usize = 40;

/// A syntax tree together with the bytes it was parsed from.
#[derive(Debug)]
pub struct ParsedSource<'src> {
    tree: tree_sitter::Tree,
    source: &'src [u8],
    language: SupportedLanguage,
}

impl<'src> ParsedSource<'src> {
    /// Parsed syntax tree.
    #[must_use]
    pub const fn tree(&self) -> &tree_sitter::Tree {
        &self.tree
    }

    /// Source bytes the tree refers to.
    #[must_use]
    pub const fn source(&self) -> &'src [u8] {
        self.source
    }

    /// Language of the parsed source.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Collects every error and missing node in document order.
    #[must_use]
    pub fn errors(&self) -> Vec<SyntaxErrorInfo> {
        let mut errors = Vec::new();
        let mut cursor = self.tree.walk();
        loop {
            let node = cursor.node();
            if node.is_error() || node.is_missing() {
                errors.push(SyntaxErrorInfo::from_node(node, self.source));
            }
            // Error subtrees are reported once, at their root.
            let descend = node.has_error() && !node.is_error();
            if descend && cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return errors;
                }
            }
        }
    }
}

/// One syntax error located in a parsed source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyntaxErrorInfo {
    /// One-based line of the error start.
    pub line: usize,
    /// One-based column (in bytes) of the error start.
    pub column: usize,
    /// Short excerpt of the offending text.
    pub context: String,
    /// Human-readable description.
    pub message: String,
}

impl SyntaxErrorInfo {
    fn from_node(node: tree_sitter::Node<'_>, source: &[u8]) -> Self {
        let start = node.start_position();
        let text = node.utf8_text(source).unwrap_or_default();
        let first_line = text.lines().next().unwrap_or_default();
        let context = if first_line.chars().count() > CONTEXT_LIMIT {
            let head: String = first_line.chars().take(CONTEXT_LIMIT).collect();
            format!("{head}...")
        } else {
            first_line.to_owned()
        };
        let message = if node.is_missing() {
            format!("missing {}", node.kind())
        } else if context.is_empty() {
            "syntax error".to_owned()
        } else {
            format!("syntax error near `{context}`")
        };

        Self {
            line: start.row.saturating_add(1),
            column: start.column.saturating_add(1),
            context,
            message,
        }
    }
}

/// Tree-sitter parser bound to one language.
pub struct Parser {
    inner: tree_sitter::Parser,
    language: SupportedLanguage,
}

impl Parser {
    /// Creates a parser for `language`.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::ParserInit`] when the grammar is incompatible
    /// with the linked Tree-sitter runtime.
    pub fn new(language: SupportedLanguage) -> Result<Self, SyntaxError> {
        let mut inner = tree_sitter::Parser::new();
        inner
            .set_language(&language.grammar())
            .map_err(|error| SyntaxError::parser_init(language, error.to_string()))?;
        Ok(Self { inner, language })
    }

    /// Language this parser was built for.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Parses `source`, recovering from syntax errors.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::Parse`] if Tree-sitter yields no tree at all.
    pub fn parse<'src>(&mut self, source: &'src [u8]) -> Result<ParsedSource<'src>, SyntaxError> {
        let tree = self
            .inner
            .parse(source, None)
            .ok_or(SyntaxError::Parse {
                language: self.language,
            })?;
        Ok(ParsedSource {
            tree,
            source,
            language: self.language,
        })
    }
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}
