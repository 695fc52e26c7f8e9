//! Shared configuration for the quill editing engine and its CLI.
//!
//! [`Config`] is layered by `ortho_config`: built-in defaults, then a
//! configuration file (`--config-path`, `QUILL_CONFIG_PATH`, or a discovered
//! `.quill.toml`), then `QUILL_*` environment variables, then command-line
//! flags. The CLI forwards only its leading configuration flags to the loader
//! so editor commands never reach it.

mod defaults;
mod logging;
mod navigation;

use std::ffi::OsString;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::{OrthoConfig, OrthoError};
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_MAX_OUTPUT_CHARS,
    HARD_FILE_SIZE_CEILING_MB, default_log_filter, default_log_filter_string, default_log_format,
    default_navigation_backend,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use navigation::NavigationBackend;

/// Number of bytes in one mebibyte.
const MIB: u64 = 1024 * 1024;

/// Resolved configuration for a quill process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "QUILL")]
pub struct Config {
    /// Directory outside of which no file may be read or written.
    ///
    /// When unset every absolute path is accepted.
    pub workspace_root: Option<Utf8PathBuf>,
    /// Largest file the dispatcher accepts, in mebibytes.
    #[ortho_config(default = DEFAULT_MAX_FILE_SIZE_MB)]
    pub max_file_size_mb: u64,
    /// Number of characters rendered before output is clipped.
    #[ortho_config(default = DEFAULT_MAX_OUTPUT_CHARS)]
    pub max_output_chars: usize,
    /// Collaborator used by the navigation commands.
    #[ortho_config(default = default_navigation_backend())]
    pub navigation_backend: NavigationBackend,
    /// `tracing` filter expression applied to the stderr subscriber.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format of the stderr subscriber.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace_root: None,
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
            max_output_chars: DEFAULT_MAX_OUTPUT_CHARS,
            navigation_backend: default_navigation_backend(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Loads configuration from the supplied command-line arguments.
    ///
    /// The first item is treated as the program name. Environment variables
    /// and configuration files are consulted as described in the crate docs.
    ///
    /// # Errors
    ///
    /// Returns the loader error when a source is malformed or a value fails
    /// to deserialise.
    pub fn load_from_args<I, T>(args: I) -> Result<Self, Arc<OrthoError>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as OrthoConfig>::load_from_iter(args)
    }

    /// Workspace boundary, if one was configured.
    #[must_use]
    pub fn workspace_root(&self) -> Option<&Utf8Path> {
        self.workspace_root.as_deref()
    }

    /// Effective per-file size limit in bytes.
    ///
    /// The configured value is clamped to the hard ceiling so a large setting
    /// cannot lift the engine's own bound.
    #[must_use]
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb
            .min(HARD_FILE_SIZE_CEILING_MB)
            .saturating_mul(MIB)
    }

    /// Output clipping threshold in characters.
    #[must_use]
    pub const fn max_output_chars(&self) -> usize {
        self.max_output_chars
    }

    /// Navigation collaborator selection.
    #[must_use]
    pub const fn navigation_backend(&self) -> NavigationBackend {
        self.navigation_backend
    }

    /// Filter expression for the telemetry subscriber.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Output format for the telemetry subscriber.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
