//! Shared fixtures for editor scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use mockall::mock;
use quill_sandbox::WorkspaceBoundary;
use rstest::fixture;
use tempfile::TempDir;

use crate::navigation::{NavigationError, NavigationQuery, Navigator, SymbolLocation};
use crate::{EditRequest, Editor, TagNavigator, ToolResult};

mock! {
    pub Backend {}

    impl Navigator for Backend {
        fn definitions(
            &mut self,
            query: &NavigationQuery,
        ) -> Result<Vec<SymbolLocation>, NavigationError>;
        fn references(
            &mut self,
            query: &NavigationQuery,
        ) -> Result<Vec<SymbolLocation>, NavigationError>;
        fn hover(&mut self, query: &NavigationQuery) -> Result<Option<String>, NavigationError>;
    }
}

/// A temporary workspace with an editor confined to it.
pub struct Workspace {
    _dir: TempDir,
    root: PathBuf,
    pub editor: Editor,
}

impl Workspace {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn write(&self, relative: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(&path, contents).expect("write file");
        path
    }

    pub fn read(&self, path: &Path) -> String {
        fs::read_to_string(path).expect("read file")
    }

    pub fn run(&mut self, request: &EditRequest) -> ToolResult {
        self.editor.execute(request)
    }

    pub fn with_limits(mut self, max_file_size: u64, max_output_chars: usize) -> Self {
        self.editor = self.editor.with_limits(max_file_size, max_output_chars);
        self
    }

    pub fn with_navigator(mut self, navigator: MockBackend) -> Self {
        self.editor = self.editor.with_navigator(Box::new(navigator));
        self
    }
}

/// Output of a result that must have succeeded.
pub fn output(result: &ToolResult) -> &str {
    assert!(result.error.is_none(), "unexpected error: {:?}", result.error);
    result.output.as_deref().expect("output")
}

/// Error message of a result that must have failed.
pub fn error(result: &ToolResult) -> &str {
    assert!(result.output.is_none(), "unexpected output: {:?}", result.output);
    result.error.as_deref().expect("error")
}

/// One hundred lines reading `Line 1` to `Line 100`.
pub fn hundred_lines() -> String {
    (1..=100).map(|number| format!("Line {number}\n")).collect()
}

#[fixture]
pub fn workspace() -> Workspace {
    let dir = TempDir::new().expect("temp dir");
    let root = dir.path().canonicalize().expect("canonical root");
    let boundary = WorkspaceBoundary::new(&root).expect("boundary");
    let editor = Editor::new(boundary, Box::new(TagNavigator::new(Some(root.clone()))));
    Workspace {
        _dir: dir,
        root,
        editor,
    }
}
