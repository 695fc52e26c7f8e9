//! Languages the host can route to a server.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

/// Languages managed by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// Python (`.py`, `.pyi`).
    Python,
    /// JavaScript (`.js`, `.jsx`).
    JavaScript,
    /// TypeScript (`.ts`, `.tsx`).
    TypeScript,
    /// Java (`.java`).
    Java,
    /// C# (`.cs`).
    CSharp,
    /// Rust (`.rs`).
    Rust,
}

impl Language {
    /// Every language the host knows about.
    pub const ALL: [Self; 6] = [
        Self::Python,
        Self::JavaScript,
        Self::TypeScript,
        Self::Java,
        Self::CSharp,
        Self::Rust,
    ];

    /// Maps a file extension (without the dot) to a language.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "py" | "pyi" => Some(Self::Python),
            "js" | "jsx" => Some(Self::JavaScript),
            "ts" | "tsx" => Some(Self::TypeScript),
            "java" => Some(Self::Java),
            "cs" => Some(Self::CSharp),
            "rs" => Some(Self::Rust),
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

    /// Identifier sent as the `languageId` of opened documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Java => "java",
            Self::CSharp => "csharp",
            Self::Rust => "rust",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Errors raised when parsing language identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported language '{0}'")]
pub struct LanguageParseError(String);

impl LanguageParseError {
    /// Returns the input that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for Language {
    type Err = LanguageParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalised = input.trim().to_ascii_lowercase();
        match normalised.as_str() {
            "python" | "py" => Ok(Self::Python),
            "javascript" | "js" => Ok(Self::JavaScript),
            "typescript" | "ts" => Ok(Self::TypeScript),
            "java" => Ok(Self::Java),
            "csharp" | "c#" | "cs" => Ok(Self::CSharp),
            "rust" | "rs" => Ok(Self::Rust),
            _ => Err(LanguageParseError(normalised)),
        }
    }
}
