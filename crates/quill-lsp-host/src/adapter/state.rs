//! Lifecycle state of a language server process.

use std::process::Child;

use super::transport::StdioTransport;

/// Whether the process has been started, and its handles while it runs.
pub(super) enum ProcessState {
    NotStarted,
    Running {
        child: Child,
        transport: StdioTransport,
    },
    Stopped,
}

impl ProcessState {
    pub(super) const fn label(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Running { .. } => "running",
            Self::Stopped => "stopped",
        }
    }
}
