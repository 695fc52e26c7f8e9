//! Grammar selection for the languages quill can parse.

use std::fmt;
use std::path::Path;

/// Languages with a bundled Tree-sitter grammar and tag query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedLanguage {
    /// Rust source files (`.rs`).
    Rust,
    /// Python source files (`.py`, `.pyi`).
    Python,
    /// TypeScript source files (`.ts`, `.tsx`, `.mts`, `.cts`).
    TypeScript,
    /// JavaScript source files (`.js`, `.jsx`, `.mjs`, `.cjs`).
    JavaScript,
}

impl SupportedLanguage {
    /// Maps a file extension to a language, ignoring case.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "rs" => Some(Self::Rust),
            "py" | "pyi" => Some(Self::Python),
            "ts" | "tsx" | "mts" | "cts" => Some(Self::TypeScript),
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::JavaScript),
            _ => None,
        }
    }

    /// Maps a path to a language by its extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Tree-sitter grammar used to parse this language.
    ///
    /// TypeScript and JavaScript share the TSX grammar, which accepts plain
    /// JavaScript and JSX as well as typed sources.
    #[must_use]
    pub fn grammar(self) -> tree_sitter::Language {
        match self {
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::TypeScript | Self::JavaScript => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// Tag query source bundled for this language.
    #[must_use]
    pub const fn tags_query(self) -> &'static str {
        match self {
            Self::Rust => include_str!("../queries/rust-tags.scm"),
            Self::Python => include_str!("../queries/python-tags.scm"),
            Self::TypeScript | Self::JavaScript => include_str!("../queries/typescript-tags.scm"),
        }
    }

    /// Lower-case identifier used in logs and messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::Python => "python",
            Self::TypeScript => "typescript",
            Self::JavaScript => "javascript",
        }
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("src/main.rs", Some(SupportedLanguage::Rust))]
    #[case("pkg/module.py", Some(SupportedLanguage::Python))]
    #[case("stubs/module.PYI", Some(SupportedLanguage::Python))]
    #[case("web/app.tsx", Some(SupportedLanguage::TypeScript))]
    #[case("web/app.mts", Some(SupportedLanguage::TypeScript))]
    #[case("web/app.jsx", Some(SupportedLanguage::JavaScript))]
    #[case("web/app.cjs", Some(SupportedLanguage::JavaScript))]
    #[case("README.md", None)]
    #[case("Makefile", None)]
    fn from_path_maps_extensions(#[case] path: &str, #[case] expected: Option<SupportedLanguage>) {
        assert_eq!(SupportedLanguage::from_path(Path::new(path)), expected);
    }

    #[rstest]
    #[case(SupportedLanguage::Rust)]
    #[case(SupportedLanguage::Python)]
    #[case(SupportedLanguage::TypeScript)]
    #[case(SupportedLanguage::JavaScript)]
    fn bundled_tag_queries_compile(#[case] language: SupportedLanguage) {
        let query = tree_sitter::Query::new(&language.grammar(), language.tags_query());
        assert!(query.is_ok(), "{language}: {query:?}");
    }
}
