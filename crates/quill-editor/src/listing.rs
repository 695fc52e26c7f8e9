//! Directory listings for `view`.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::EditorError;

const LISTING_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::listing");

/// Depth of the listing below the requested directory.
pub const LISTING_DEPTH: usize = 2;

fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn visible(entry: &DirEntry) -> bool {
    entry.depth() == 0 || !is_hidden(entry.file_name())
}

/// Lists the non-hidden entries up to two levels below `root`, sorted by path
/// with directories suffixed by `/`.
///
/// Symbolic links are listed but never descended into, so a link to a
/// directory outside the workspace reveals nothing beyond its own name.
///
/// # Errors
///
/// Returns [`EditorError::Io`] when `root` cannot be read.
pub fn list_directory(root: &Path) -> Result<String, EditorError> {
    let hidden = fs::read_dir(root)
        .map_err(|source| EditorError::io(root, source))?
        .filter_map(Result::ok)
        .filter(|entry| is_hidden(&entry.file_name()))
        .count();

    let mut paths: Vec<String> = WalkDir::new(root)
        .max_depth(LISTING_DEPTH)
        .into_iter()
        .filter_entry(visible)
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(error) => {
                debug!(target: LISTING_TARGET, %error, "skipping unreadable entry");
                None
            }
        })
        .map(|entry| {
            let rendered = entry.path().display().to_string();
            if entry.file_type().is_dir() {
                format!("{rendered}/")
            } else {
                rendered
            }
        })
        .collect();
    paths.sort();

    let mut listing = format!(
        "Here's the files and directories up to 2 levels deep in {}, excluding hidden items:\n{}",
        root.display(),
        paths.join("\n")
    );
    if hidden > 0 {
        listing.push_str(&format!(
            "\n\n{hidden} hidden files/directories in this directory are excluded. You can use 'ls -la {}' to see them.",
            root.display()
        ));
    }
    Ok(listing)
}
