//! Spawning and stopping language server processes.

use std::io;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use super::config::LspServerConfig;
use super::error::AdapterError;
use super::transport::StdioTransport;
use crate::Language;

/// Log target for adapter operations.
pub(super) const ADAPTER_TARGET: &str = "quill_lsp_host::adapter";

/// How long a server may take to exit after `exit` before it is killed.
const EXIT_GRACE_PERIOD: Duration = Duration::from_millis(200);

/// Spawns the configured command with piped stdio.
pub(super) fn spawn_process(
    language: Language,
    config: &LspServerConfig,
) -> Result<(Child, StdioTransport), AdapterError> {
    debug!(
        target: ADAPTER_TARGET,
        %language,
        command = %config.command.display(),
        args = ?config.args,
        "spawning language server process"
    );

    let mut command = Command::new(&config.command);
    command
        .args(&config.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());
    if let Some(dir) = &config.working_dir {
        command.current_dir(dir);
    }

    let mut child = command.spawn().map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            AdapterError::BinaryNotFound {
                command: config.command.display().to_string(),
                source,
            }
        } else {
            AdapterError::SpawnFailed {
                message: format!("failed to start {}", config.command.display()),
                source,
            }
        }
    })?;

    let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
        kill_and_reap(&mut child, language);
        return Err(AdapterError::SpawnFailed {
            message: "failed to capture stdio pipes".to_owned(),
            source: io::Error::other("missing pipe"),
        });
    };

    debug!(target: ADAPTER_TARGET, %language, pid = child.id(), "language server process spawned");
    Ok((child, StdioTransport::from_pipes(stdout, stdin)))
}

/// Waits briefly for the child to exit, then kills it.
pub(super) fn terminate_child(child: &mut Child, language: Language) {
    if let Ok(Some(status)) = child.try_wait() {
        debug!(target: ADAPTER_TARGET, %language, ?status, "language server exited");
        return;
    }

    thread::sleep(EXIT_GRACE_PERIOD);
    match child.try_wait() {
        Ok(Some(status)) => {
            debug!(
                target: ADAPTER_TARGET,
                %language,
                ?status,
                "language server exited during grace period"
            );
        }
        Ok(None) | Err(_) => {
            warn!(
                target: ADAPTER_TARGET,
                %language,
                "language server did not exit gracefully, killing it"
            );
            kill_and_reap(child, language);
        }
    }
}

/// Kills the child and collects its exit status.
pub(super) fn kill_and_reap(child: &mut Child, language: Language) {
    if let Err(error) = child.kill() {
        warn!(target: ADAPTER_TARGET, %language, %error, "failed to kill language server");
        return;
    }
    if let Err(error) = child.wait() {
        warn!(target: ADAPTER_TARGET, %language, %error, "failed to reap language server");
    }
}
