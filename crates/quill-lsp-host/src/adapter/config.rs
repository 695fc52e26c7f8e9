//! Launch configuration for language server processes.

use std::path::PathBuf;

use crate::Language;

/// Command line used to spawn a language server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LspServerConfig {
    /// Executable path or command name resolved through `PATH`.
    pub command: PathBuf,
    /// Arguments passed to the executable.
    pub args: Vec<String>,
    /// Working directory, also announced as the workspace folder.
    pub working_dir: Option<PathBuf>,
}

impl LspServerConfig {
    /// Creates a configuration for an arbitrary command.
    #[must_use]
    pub fn new(command: impl Into<PathBuf>, args: &[&str]) -> Self {
        Self {
            command: command.into(),
            args: args.iter().map(|arg| (*arg).to_owned()).collect(),
            working_dir: None,
        }
    }

    /// Default server for each language. Binaries are expected on `PATH`.
    #[must_use]
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::Python => Self::new("pylsp", &[]),
            Language::JavaScript | Language::TypeScript => {
                Self::new("typescript-language-server", &["--stdio"])
            }
            Language::Java => Self::new("jdtls", &[]),
            Language::CSharp => Self::new("csharp-ls", &[]),
            Language::Rust => Self::new("rust-analyzer", &[]),
        }
    }

    /// Sets the working directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}
