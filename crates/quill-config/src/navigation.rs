use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Selects which collaborator answers navigation commands.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum NavigationBackend {
    /// Ask a language server first and fall back to the tag index.
    #[default]
    Auto,
    /// Only consult the tree-sitter tag index.
    Tags,
}
