//! Entrypoint for the `quill` file-editing tool.
//!
//! The binary delegates to [`quill_cli::run`], which loads configuration,
//! parses the editor command, runs it and writes the result.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    quill_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
