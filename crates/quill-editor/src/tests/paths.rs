//! Path validation ahead of every command.

use std::fs;

use rstest::rstest;
use tempfile::TempDir;

use super::support::{Workspace, error, workspace};
use crate::{Command, EditRequest};

#[rstest]
fn relative_paths_suggest_an_absolute_one(mut workspace: Workspace) {
    let result = workspace.run(&EditRequest::new(Command::View, "src/lib.rs"));
    assert_eq!(
        error(&result),
        format!(
            "Invalid `path` parameter: src/lib.rs. The path should be an absolute path, starting with `/`. Maybe you meant {}/src/lib.rs?",
            workspace.root().display()
        )
    );
}

#[rstest]
fn parent_segments_cannot_leave_the_workspace(mut workspace: Workspace) {
    let escape = workspace.root().join("../outside.txt");
    let result = workspace.run(
        &EditRequest::new(Command::Create, escape.clone()).with_file_text("nope"),
    );
    assert_eq!(
        error(&result),
        format!(
            "File access not permitted: {}. You can only access paths inside the workspace.",
            escape.display()
        )
    );
    assert!(!escape.exists());
}

#[cfg(unix)]
#[rstest]
fn symlinks_pointing_outside_are_rejected(mut workspace: Workspace) {
    let outside = TempDir::new().expect("outside dir");
    let secret = outside.path().join("secret.txt");
    fs::write(&secret, "token = 42\n").expect("write secret");
    let link = workspace.path("innocent.txt");
    std::os::unix::fs::symlink(&secret, &link).expect("symlink");

    let view = workspace.run(&EditRequest::new(Command::View, link.clone()));
    assert!(error(&view).starts_with("File access not permitted"));

    let replace = workspace.run(
        &EditRequest::new(Command::StrReplace, link)
            .with_old_str("42")
            .with_new_str("0"),
    );
    assert!(error(&replace).starts_with("File access not permitted"));
    assert_eq!(fs::read_to_string(&secret).expect("read"), "token = 42\n");
}

#[rstest]
fn absolute_paths_elsewhere_are_rejected(mut workspace: Workspace) {
    let outside = TempDir::new().expect("outside dir");
    let path = outside.path().join("notes.txt");
    fs::write(&path, "hello\n").expect("write");

    let result = workspace.run(&EditRequest::new(Command::View, path));
    assert!(error(&result).starts_with("File access not permitted"));
}

#[rstest]
fn create_refuses_to_overwrite(mut workspace: Workspace) {
    let path = workspace.write("a.txt", "original\n");
    let result =
        workspace.run(&EditRequest::new(Command::Create, path.clone()).with_file_text("new"));
    assert_eq!(
        error(&result),
        format!(
            "Invalid `path` parameter: {0}. File already exists at: {0}. Cannot overwrite files using command `create`.",
            path.display()
        )
    );
    assert_eq!(workspace.read(&path), "original\n");
}

#[rstest]
#[case(Command::View)]
#[case(Command::StrReplace)]
#[case(Command::UndoEdit)]
#[case(Command::Hover)]
fn missing_paths_are_reported(mut workspace: Workspace, #[case] command: Command) {
    let path = workspace.path("missing.txt");
    let result = workspace.run(&EditRequest::new(command, path.clone()).with_old_str("x"));
    assert_eq!(
        error(&result),
        format!(
            "The path {} does not exist. Please provide a valid path.",
            path.display()
        )
    );
    assert_eq!(result.path.as_deref(), Some(path.display().to_string().as_str()));
}

#[rstest]
#[case(Command::StrReplace)]
#[case(Command::Insert)]
#[case(Command::UndoEdit)]
fn directories_only_support_view(mut workspace: Workspace, #[case] command: Command) {
    let dir = workspace.path("src");
    fs::create_dir_all(&dir).expect("mkdir");
    let result = workspace.run(&EditRequest::new(command, dir.clone()));
    assert_eq!(
        error(&result),
        format!(
            "Invalid `path` parameter: {0}. The path {0} is a directory and only the `view` command can be used on directories.",
            dir.display()
        )
    );
}

#[cfg(unix)]
#[rstest]
fn climbing_out_of_a_missing_directory_cannot_reach_a_symlink(mut workspace: Workspace) {
    let outside = TempDir::new().expect("outside dir");
    std::os::unix::fs::symlink(outside.path(), workspace.path("link")).expect("symlink");
    let planted = workspace.root().join("nope/../link/planted.txt");

    let result = workspace.run(
        &EditRequest::new(Command::Create, planted.clone()).with_file_text("payload"),
    );
    assert_eq!(
        error(&result),
        format!(
            "File access not permitted: {}. You can only access paths inside the workspace.",
            planted.display()
        )
    );
    assert!(!outside.path().join("planted.txt").exists());
}
