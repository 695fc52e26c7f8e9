//! Errors raised while parsing sources or extracting tags.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::language::SupportedLanguage;

/// Errors from parsing and tag extraction.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyntaxError {
    /// The grammar could not be loaded into a Tree-sitter parser.
    #[error("failed to initialise parser for {language}: {message}")]
    ParserInit {
        /// Language whose grammar failed to load.
        language: SupportedLanguage,
        /// Description of the failure.
        message: String,
    },

    /// Tree-sitter returned no tree for the source.
    #[error("failed to parse {language} source")]
    Parse {
        /// Language that was being parsed.
        language: SupportedLanguage,
    },

    /// A bundled tag query does not compile against its grammar.
    #[error("invalid tag query for {language}: {message}")]
    Query {
        /// Language the query targets.
        language: SupportedLanguage,
        /// Description of the compilation failure.
        message: String,
    },

    /// The source file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
    },
}

impl SyntaxError {
    /// Creates a parser initialisation error.
    #[must_use]
    pub fn parser_init(language: SupportedLanguage, message: impl Into<String>) -> Self {
        Self::ParserInit {
            language,
            message: message.into(),
        }
    }

    /// Creates a query compilation error.
    #[must_use]
    pub fn query(language: SupportedLanguage, message: impl Into<String>) -> Self {
        Self::Query {
            language,
            message: message.into(),
        }
    }

    /// Creates a read error for `path`.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
