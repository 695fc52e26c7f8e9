//! CLI argument definitions for the quill editor.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use quill_editor::{Command, EditRequest};
use strum::VariantNames;

/// Command-line interface for the quill file editor.
#[derive(Parser, Debug)]
#[command(name = "quill", version, about = "Views and edits files on behalf of an agent")]
pub(crate) struct Cli {
    /// Editor command to run.
    #[arg(value_name = "COMMAND", value_parser = parse_command)]
    pub(crate) command: Command,
    /// Absolute path of the file or directory.
    #[arg(value_name = "PATH")]
    pub(crate) path: PathBuf,
    /// Content of the file to create.
    #[arg(long)]
    pub(crate) file_text: Option<String>,
    /// Line range to view, as `start,end`; an end of `-1` reads to the end.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub(crate) view_range: Option<Vec<i64>>,
    /// Text to replace, or the symbol anchor for navigation commands.
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) old_str: Option<String>,
    /// Replacement or inserted text.
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) new_str: Option<String>,
    /// Line after which `--new-str` is inserted.
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) insert_line: Option<i64>,
    /// Reports syntax errors introduced by an edit.
    #[arg(long)]
    pub(crate) enable_linting: bool,
    /// Prints the tagged JSON envelope instead of the formatted output.
    #[arg(long)]
    pub(crate) raw: bool,
}

impl From<Cli> for EditRequest {
    fn from(cli: Cli) -> Self {
        Self {
            command: cli.command,
            path: cli.path,
            file_text: cli.file_text,
            view_range: cli.view_range,
            old_str: cli.old_str,
            new_str: cli.new_str,
            insert_line: cli.insert_line,
            enable_linting: cli.enable_linting,
        }
    }
}

fn parse_command(value: &str) -> Result<Command, String> {
    Command::from_str(value).map_err(|_| {
        format!(
            "unknown command `{value}`; expected one of: {}",
            Command::VARIANTS.join(", ")
        )
    })
}
