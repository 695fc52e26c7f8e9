//! File-editing engine for automated agents.
//!
//! The [`Editor`] accepts one [`EditRequest`] at a time and answers with a
//! [`ToolResult`]. It supports viewing, creating, replacing, inserting and
//! undoing, plus three navigation commands answered by a [`Navigator`].
//! Every path is authorised against a workspace boundary before it is
//! touched; reads and rewrites stream through [`LargeFileOps`] so memory use
//! does not grow with file size; and each file keeps the byte encoding it was
//! found in.
//!
//! ```rust,no_run
//! use quill_editor::{Command, EditRequest, Editor, TagNavigator};
//! use quill_sandbox::WorkspaceBoundary;
//!
//! # fn main() -> Result<(), quill_sandbox::SandboxError> {
//! let boundary = WorkspaceBoundary::new("/workspace")?;
//! let mut editor = Editor::new(boundary, Box::new(TagNavigator::new(None)));
//!
//! let request = EditRequest::new(Command::StrReplace, "/workspace/src/lib.rs")
//!     .with_old_str("fn old_name(")
//!     .with_new_str("fn new_name(");
//! let result = editor.execute(&request);
//! println!("{}", result.formatted_output_and_error());
//! # Ok(()) }
//! ```

mod dispatcher;
pub mod encoding;
mod error;
pub mod file_ops;
mod history;
mod listing;
pub mod navigation;
pub mod output;
mod request;
mod result;

pub use dispatcher::Editor;
pub use encoding::{EncodingError, EncodingManager, TextEncoding};
pub use error::EditorError;
pub use file_ops::{FileOpsError, LargeFileOps, ParsedMatch};
pub use history::{EditHistory, Snapshot};
pub use listing::{LISTING_DEPTH, list_directory};
pub use navigation::{
    ChainedNavigator, LspNavigator, NavigationError, NavigationQuery, Navigator, SymbolLocation,
    TagNavigator,
};
pub use request::{Command, EditRequest};
pub use result::ToolResult;

#[cfg(test)]
mod tests;
