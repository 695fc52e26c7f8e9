//! Editor scenarios driven through [`crate::Editor::execute`].

mod editing;
mod paths;
mod support;
