//! Command-line runtime for the quill file editor.
//!
//! The module owns argument parsing, configuration bootstrapping, telemetry
//! and result rendering. One process runs one editor command. The runtime
//! can be driven from the binary entrypoint or from tests, where the
//! configuration loader and the IO streams are substituted.

use std::ffi::OsString;
use std::fmt::Display;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use quill_editor::{EditRequest, Editor, ToolResult};
use tracing::{debug, warn};

mod cli;
mod config;
pub mod envelope;
mod errors;
pub mod telemetry;

use cli::Cli;
use config::{ConfigArgumentSplit, split_config_arguments};
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
pub(crate) use errors::AppError;

/// Tracing target for CLI events.
const CLI_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::runner");

/// CLI flags recognised by the configuration loader.
///
/// MAINTENANCE: This list must match the fields of `quill_config::Config`.
const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--workspace-root",
    "--max-file-size-mb",
    "--max-output-chars",
    "--navigation-backend",
    "--log-filter",
    "--log-format",
];

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) const fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self { stdout, stderr }
    }
}

struct CliRunner<'a, W: Write, E: Write, L: ConfigLoader> {
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
}

impl<'a, W, E, L> CliRunner<'a, W, E, L>
where
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    const fn new(io: &'a mut IoStreams<'a, W, E>, loader: &'a L) -> Self {
        Self { io, loader }
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&args);
        let cli_arguments = prepare_cli_arguments(&args, &split);

        let outcome = Cli::try_parse_from(cli_arguments)
            .map_err(AppError::CliUsage)
            .and_then(|cli| {
                self.loader
                    .load(&split.config_arguments)
                    .map(|config| (cli, config))
            })
            .and_then(|(cli, config)| {
                telemetry::initialise(&config)?;
                let mut editor = Editor::from_config(&config).map_err(AppError::Workspace)?;
                let raw = cli.raw;
                let request = EditRequest::from(cli);
                debug!(
                    target: CLI_TARGET,
                    command = %request.command,
                    path = %request.path.display(),
                    "running command"
                );
                let result = editor.execute(&request);
                self.emit(&result, raw)
            });

        match outcome {
            Ok(exit_code) => exit_code,
            Err(AppError::CliUsage(error)) if !error.use_stderr() => {
                if write_diagnostic(self.io.stdout, &error) {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                }
            }
            Err(error) => {
                write_diagnostic(self.io.stderr, &error);
                ExitCode::FAILURE
            }
        }
    }

    /// Writes `result` to stdout and maps it onto the process exit status.
    fn emit(&mut self, result: &ToolResult, raw: bool) -> Result<ExitCode, AppError> {
        let text = if raw {
            envelope::render(result).map_err(AppError::SerialiseResult)?
        } else {
            result.formatted_output_and_error()
        };
        let terminator = if text.ends_with('\n') { "" } else { "\n" };
        write!(self.io.stdout, "{text}{terminator}").map_err(AppError::WriteOutput)?;
        Ok(if result.is_error() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        })
    }
}

/// Writes one diagnostic line, logging when the stream is gone.
fn write_diagnostic<T: Write>(stream: &mut T, message: &impl Display) -> bool {
    let text = message.to_string();
    match writeln!(stream, "{}", text.trim_end()) {
        Ok(()) => true,
        Err(error) => {
            warn!(target: CLI_TARGET, %error, "failed to write diagnostics");
            false
        }
    }
}

fn prepare_cli_arguments(args: &[OsString], split: &ConfigArgumentSplit) -> Vec<OsString> {
    args.first()
        .into_iter()
        .chain(args.iter().skip(split.command_start))
        .cloned()
        .collect()
}

/// Runs the CLI using the provided arguments and IO handles.
///
/// Returns a failure exit code when configuration cannot be loaded, the
/// arguments do not parse, or the editor reports an error for the command.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr);
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

/// Runs the CLI with a custom configuration loader.
pub(crate) fn run_with_loader<'a, I, W, E, L>(
    args: I,
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(io, loader).run(args)
}

#[cfg(test)]
mod tests;
