//! Configuration loading helpers for the quill CLI.
//!
//! Only the leading configuration flags are handed to `ortho_config`; the
//! editor command and its parameters are parsed separately by clap.

use std::ffi::{OsStr, OsString};

use quill_config::Config;

use crate::AppError;

pub(crate) trait ConfigLoader {
    /// Loads configuration for the CLI.
    ///
    /// # Flag Ordering
    ///
    /// Configuration flags (listed in `CONFIG_CLI_FLAGS`) must appear before
    /// the command name. Configuration flags after it are parsed as command
    /// arguments and rejected by clap.
    fn load(&self, args: &[OsString]) -> Result<Config, AppError>;
}

pub(crate) struct OrthoConfigLoader;

#[derive(Debug, Clone, Copy)]
enum FlagAction {
    Include { needs_value: bool },
    Skip,
}

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        Config::load_from_args(args.iter().cloned()).map_err(AppError::LoadConfiguration)
    }
}

impl OrthoConfigLoader {
    fn process_config_flag(argument: &OsStr) -> FlagAction {
        let text = argument.to_string_lossy();
        if !text.starts_with("--") {
            return FlagAction::Skip;
        }

        let (flag, has_inline_value) = text
            .split_once('=')
            .map_or((text.as_ref(), false), |(flag, _)| (flag, true));
        if super::CONFIG_CLI_FLAGS.contains(&flag) {
            return FlagAction::Include {
                needs_value: !has_inline_value,
            };
        }
        FlagAction::Skip
    }
}

pub(crate) struct ConfigArgumentSplit {
    pub(crate) config_arguments: Vec<OsString>,
    pub(crate) command_start: usize,
}

/// Separates the program name and leading configuration flags from the
/// editor command that follows them.
pub(crate) fn split_config_arguments(args: &[OsString]) -> ConfigArgumentSplit {
    let Some((program, rest)) = args.split_first() else {
        return ConfigArgumentSplit {
            config_arguments: Vec::new(),
            command_start: 0,
        };
    };

    let mut config_arguments = vec![program.clone()];
    let mut pending_value = false;
    for argument in rest {
        if pending_value {
            config_arguments.push(argument.clone());
            pending_value = false;
            continue;
        }
        match OrthoConfigLoader::process_config_flag(argument) {
            FlagAction::Include { needs_value } => {
                config_arguments.push(argument.clone());
                pending_value = needs_value;
            }
            FlagAction::Skip => break,
        }
    }

    let command_start = config_arguments.len();
    ConfigArgumentSplit {
        config_arguments,
        command_start,
    }
}
