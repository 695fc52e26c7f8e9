//! Mutating commands and their undo history.

use std::fs;
use std::path::Path;

use encoding_rs::WINDOWS_1251;
use rstest::rstest;

use super::support::{Workspace, error, hundred_lines, output, workspace};
use crate::{Command, EditRequest, TextEncoding};

fn replace(path: &Path, old: &str, new: &str) -> EditRequest {
    EditRequest::new(Command::StrReplace, path)
        .with_old_str(old)
        .with_new_str(new)
}

fn insert(path: &Path, line: i64, text: &str) -> EditRequest {
    EditRequest::new(Command::Insert, path)
        .with_insert_line(line)
        .with_new_str(text)
}

#[rstest]
fn replaces_a_unique_line_and_shows_its_neighbourhood(mut workspace: Workspace) {
    let path = workspace.write("lines.txt", hundred_lines());
    let result = workspace.run(&replace(&path, "Line 50", "Modified Line 50"));

    let snippet: String = (46..=54)
        .map(|number| {
            let text = if number == 50 {
                "Modified Line 50".to_owned()
            } else {
                format!("Line {number}")
            };
            format!("{number:>6}\t{text}\n")
        })
        .collect();
    assert_eq!(
        output(&result),
        format!(
            "The file {0} has been edited. Here's the result of running `cat -n` on a snippet of {0}:\n{snippet}Review the changes and make sure they are as expected. Edit the file again if necessary.",
            path.display()
        )
    );

    let text = workspace.read(&path);
    assert!(text.contains("Line 49\nModified Line 50\nLine 51\n"));
    assert_eq!(result.old_content.as_deref(), Some(hundred_lines().as_str()));
    assert_eq!(result.new_content.as_deref(), Some(text.as_str()));
}

#[rstest]
fn ambiguous_replacements_list_every_line(mut workspace: Workspace) {
    let path = workspace.write("lines.txt", hundred_lines());
    let result = workspace.run(&replace(&path, "Line 1", "First"));
    assert_eq!(
        error(&result),
        "No replacement was performed. Multiple occurrences of old_str `Line 1` in lines [1, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 100]. Please ensure it is unique."
    );
    assert_eq!(workspace.read(&path), hundred_lines());

    let undo = workspace.run(&EditRequest::new(Command::UndoEdit, path.clone()));
    assert_eq!(
        error(&undo),
        format!("No edit history found for {}.", path.display())
    );
}

#[rstest]
fn absent_text_is_not_replaced(mut workspace: Workspace) {
    let path = workspace.write("a.txt", "alpha\nbeta\n");
    let result = workspace.run(&replace(&path, "gamma", "delta"));
    assert_eq!(
        error(&result),
        format!(
            "No replacement was performed, old_str `gamma` did not appear verbatim in {}.",
            path.display()
        )
    );
}

#[rstest]
fn replacement_parameters_are_checked(mut workspace: Workspace) {
    let path = workspace.write("a.txt", "alpha\n");

    let same = workspace.run(&replace(&path, "alpha", "alpha"));
    assert_eq!(
        error(&same),
        "No replacement was performed. `new_str` and `old_str` must be different."
    );

    let missing = workspace.run(&EditRequest::new(Command::StrReplace, path.clone()));
    assert_eq!(
        error(&missing),
        "Parameter `old_str` is required for command: str_replace."
    );

    let deleted = workspace.run(&EditRequest::new(Command::StrReplace, path.clone()).with_old_str("alpha\n"));
    assert!(deleted.error.is_none());
    assert_eq!(workspace.read(&path), "");
}

#[rstest]
fn multi_line_replacements_keep_surrounding_lines(mut workspace: Workspace) {
    let path = workspace.write("a.py", "def f():\n    x = 1\n    return x\n\nprint(f())\n");
    let result = workspace.run(&replace(&path, "    x = 1\n    return x\n", "    return 1\n"));
    assert!(result.error.is_none(), "{:?}", result.error);
    assert_eq!(workspace.read(&path), "def f():\n    return 1\n\nprint(f())\n");
}

#[rstest]
fn inserts_after_the_requested_line(mut workspace: Workspace) {
    let path = workspace.write("a.txt", "a\nb\nc\n");
    let result = workspace.run(&insert(&path, 1, "X"));
    assert_eq!(workspace.read(&path), "a\nX\nb\nc\n");
    assert!(output(&result).contains("     1\ta\n     2\tX\n     3\tb\n     4\tc\n"));

    workspace.run(&insert(&path, 0, "top\n"));
    assert_eq!(workspace.read(&path), "top\na\nX\nb\nc\n");
}

#[rstest]
fn inserting_after_an_unterminated_last_line_adds_a_terminator(mut workspace: Workspace) {
    let path = workspace.write("a.txt", "a\nb");
    let result = workspace.run(&insert(&path, 2, "c"));
    assert!(result.error.is_none(), "{:?}", result.error);
    assert_eq!(workspace.read(&path), "a\nb\nc\n");
}

#[rstest]
#[case(-1)]
#[case(4)]
fn insert_lines_must_be_inside_the_file(mut workspace: Workspace, #[case] line: i64) {
    let path = workspace.write("a.txt", "a\nb\nc\n");
    let result = workspace.run(&insert(&path, line, "X"));
    assert_eq!(
        error(&result),
        format!(
            "Invalid `insert_line` parameter: {line}. It should be within the range of lines of the file: [0, 3]"
        )
    );
    assert_eq!(workspace.read(&path), "a\nb\nc\n");
}

#[rstest]
fn insert_requires_its_parameters(mut workspace: Workspace) {
    let path = workspace.write("a.txt", "a\n");
    let no_line = workspace.run(&EditRequest::new(Command::Insert, path.clone()).with_new_str("x"));
    assert_eq!(
        error(&no_line),
        "Parameter `insert_line` is required for command: insert."
    );
    let no_text = workspace.run(&EditRequest::new(Command::Insert, path.clone()).with_insert_line(0));
    assert_eq!(
        error(&no_text),
        "Parameter `new_str` is required for command: insert."
    );
}

#[rstest]
fn create_writes_new_files_and_their_parents(mut workspace: Workspace) {
    let path = workspace.path("nested/dir/new.txt");
    let result =
        workspace.run(&EditRequest::new(Command::Create, path.clone()).with_file_text("hello\n"));
    assert_eq!(
        output(&result),
        format!("File created successfully at: {}", path.display())
    );
    assert!(!result.prev_exist);
    assert_eq!(result.new_content.as_deref(), Some("hello\n"));
    assert_eq!(workspace.read(&path), "hello\n");

    let missing_text = workspace.run(&EditRequest::new(Command::Create, workspace.path("b.txt")));
    assert_eq!(
        error(&missing_text),
        "Parameter `file_text` is required for command: create."
    );
}

#[rstest]
fn undo_reverses_each_edit_in_turn(mut workspace: Workspace) {
    let path = workspace.path("story.txt");
    workspace.run(&EditRequest::new(Command::Create, path.clone()).with_file_text("one\ntwo\n"));
    workspace.run(&replace(&path, "two", "2"));
    workspace.run(&insert(&path, 2, "three"));
    assert_eq!(workspace.read(&path), "one\n2\nthree\n");

    let first = workspace.run(&EditRequest::new(Command::UndoEdit, path.clone()));
    assert_eq!(
        output(&first),
        format!(
            "Last edit to {0} undone successfully. Here's the result of running `cat -n` on {0}:\n     1\tone\n     2\t2\n",
            path.display()
        )
    );
    assert_eq!(fs::read(&path).expect("read"), b"one\n2\n");

    workspace.run(&EditRequest::new(Command::UndoEdit, path.clone()));
    assert_eq!(fs::read(&path).expect("read"), b"one\ntwo\n");

    let last = workspace.run(&EditRequest::new(Command::UndoEdit, path.clone()));
    assert_eq!(
        output(&last),
        format!(
            "Last edit to {} undone successfully. The file was removed.",
            path.display()
        )
    );
    assert!(!path.exists());
}

#[cfg(unix)]
#[rstest]
fn failed_undo_keeps_the_history_entry(mut workspace: Workspace) {
    use std::os::unix::fs::PermissionsExt;

    let path = workspace.write("locked.txt", "before\n");
    workspace.run(&replace(&path, "before", "after"));
    fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).expect("chmod");
    if fs::read(&path).is_ok() {
        // Privileged users read regardless of mode bits.
        return;
    }

    let failed = workspace.run(&EditRequest::new(Command::UndoEdit, path.clone()));
    assert!(failed.is_error());

    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).expect("chmod");
    let retried = workspace.run(&EditRequest::new(Command::UndoEdit, path.clone()));
    assert!(!retried.is_error(), "{:?}", retried.error);
    assert_eq!(workspace.read(&path), "before\n");
}

#[rstest]
fn legacy_encodings_survive_a_replacement(mut workspace: Workspace) {
    let body = "Привет, мир! Это тестовый файл с русским текстом.\n".repeat(40);
    let original = format!("{body}Старое значение\n");
    let (bytes, _, _) = WINDOWS_1251.encode(&original);
    let path = workspace.write("ru.txt", &bytes);

    let result = workspace.run(&replace(&path, "Старое значение", "Новое значение"));
    assert!(result.error.is_none(), "{:?}", result.error);

    let written = fs::read(&path).expect("read");
    let (decoded, _, malformed) = WINDOWS_1251.decode(&written);
    assert!(!malformed);
    assert_eq!(decoded, format!("{body}Новое значение\n"));
    assert!(String::from_utf8(written).is_err(), "file must stay windows-1251");
}

#[rstest]
fn utf16_files_keep_their_byte_order_mark(mut workspace: Workspace) {
    let encoding = TextEncoding::from_bom(&[0xFF, 0xFE]).expect("UTF-16LE");
    let bytes = encoding.encode("alpha\nbeta\n").expect("encode");
    let path = workspace.write("wide.txt", &bytes);

    let result = workspace.run(&replace(&path, "beta", "gamma"));
    assert!(result.error.is_none(), "{:?}", result.error);

    let written = fs::read(&path).expect("read");
    assert_eq!(written.get(..4), Some(&[0xFF, 0xFE, b'a', 0][..]));
    assert_eq!(encoding.decode(&written).expect("decode"), "alpha\ngamma\n");
}

#[rstest]
fn explicit_encodings_override_detection(mut workspace: Workspace) {
    let latin = TextEncoding::for_label("latin1").expect("label");
    let path = workspace.write("cafe.txt", b"caf\xE9\n");
    workspace.editor.set_encoding(&path, latin);

    let result = workspace.run(&replace(&path, "café", "bar"));
    assert!(result.error.is_none(), "{:?}", result.error);
    assert_eq!(fs::read(&path).expect("read"), b"bar\n");
}

#[rstest]
fn binary_files_are_refused(mut workspace: Workspace) {
    let path = workspace.write("blob.bin", [0_u8, 159, 146, 150, 0, 1]);
    let result = workspace.run(&replace(&path, "a", "b"));
    assert_eq!(
        error(&result),
        format!(
            "File {} appears to be binary. Only text files can be edited.",
            path.display()
        )
    );
}

#[rstest]
fn files_over_the_configured_limit_are_refused(workspace: Workspace) {
    let mut workspace = workspace.with_limits(16, 1_000);
    let path = workspace.write("big.txt", "0123456789\n0123456789\n");
    let result = workspace.run(&EditRequest::new(Command::View, path.clone()));
    assert_eq!(
        error(&result),
        format!(
            "File {} is too large (22 bytes). Maximum allowed size is 16 bytes.",
            path.display()
        )
    );
}

#[rstest]
fn lint_reports_follow_python_edits(mut workspace: Workspace) {
    let path = workspace.write("a.py", "def f():\n    return 1\n");

    let clean = workspace.run(&replace(&path, "return 1", "return 2").with_linting(true));
    assert!(output(&clean).contains("No linting issues found in the changes."));

    let broken = workspace.run(&replace(&path, "return 2", "return (").with_linting(true));
    assert!(output(&broken).contains("Linting issues found in the changes:\n- Line "));
}

#[rstest]
fn lint_is_unavailable_without_a_grammar(mut workspace: Workspace) {
    let path = workspace.write("notes.txt", "draft\n");
    let result = workspace.run(&replace(&path, "draft", "final").with_linting(true));
    assert!(output(&result).contains(&format!(
        "Linting is not available for {}.",
        path.display()
    )));
}
