use std::io;
use std::sync::Arc;

use quill_sandbox::SandboxError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

/// Failures that stop the CLI before or after the editor runs.
///
/// Editor errors are not represented here: they are part of the command
/// result and rendered like any other output.
#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to open workspace: {0}")]
    Workspace(#[source] SandboxError),
    #[error("failed to serialise command result: {0}")]
    SerialiseResult(#[source] serde_json::Error),
    #[error("failed to write command output: {0}")]
    WriteOutput(#[source] io::Error),
}
