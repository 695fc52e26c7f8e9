use crate::logging::LogFormat;
use crate::navigation::NavigationBackend;

/// Hard ceiling for any file the editor will touch, in mebibytes.
pub const HARD_FILE_SIZE_CEILING_MB: u64 = 1024;

/// Default per-file size limit enforced by the dispatcher, in mebibytes.
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = HARD_FILE_SIZE_CEILING_MB;

/// Default number of characters rendered before output is clipped.
pub const DEFAULT_MAX_OUTPUT_CHARS: usize = 16_000;

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default navigation backend.
#[must_use]
pub const fn default_navigation_backend() -> NavigationBackend {
    NavigationBackend::Auto
}
