//! Runner tests with a substituted configuration loader.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use camino::Utf8PathBuf;
use quill_config::{Config, NavigationBackend};
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;

struct StubLoader {
    config: Config,
}

impl ConfigLoader for StubLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

struct Harness {
    _dir: TempDir,
    root: PathBuf,
    loader: StubLoader,
}

impl Harness {
    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn run(&self, args: &[&str]) -> (ExitCode, String, String) {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut io = IoStreams::new(&mut stdout, &mut stderr);
        let arguments = std::iter::once("quill")
            .chain(args.iter().copied())
            .map(OsString::from);
        let exit = run_with_loader(arguments, &mut io, &self.loader);
        (
            exit,
            String::from_utf8(stdout).expect("utf-8 stdout"),
            String::from_utf8(stderr).expect("utf-8 stderr"),
        )
    }
}

#[fixture]
fn harness() -> Harness {
    let dir = TempDir::new().expect("temp dir");
    let root = dir.path().canonicalize().expect("canonical root");
    let config = Config {
        workspace_root: Some(Utf8PathBuf::try_from(root.clone()).expect("utf-8 root")),
        navigation_backend: NavigationBackend::Tags,
        ..Config::default()
    };
    Harness {
        _dir: dir,
        root,
        loader: StubLoader { config },
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

#[rstest]
fn creates_then_views_a_file(harness: Harness) {
    let file = display(&harness.path("notes.txt"));

    let (exit, stdout, stderr) = harness.run(&["create", &file, "--file-text", "one\ntwo\n"]);
    assert_eq!(exit, ExitCode::SUCCESS, "stderr: {stderr}");
    assert_eq!(stdout, format!("File created successfully at: {file}\n"));

    let (exit, stdout, _) = harness.run(&["view", &file, "--view-range", "2,-1"]);
    assert_eq!(exit, ExitCode::SUCCESS);
    assert!(stdout.ends_with("     2\ttwo\n"), "{stdout}");
}

#[rstest]
fn replaces_text_and_shows_a_snippet(harness: Harness) {
    let file = harness.path("main.py");
    fs::write(&file, "x = 1\ny = 2\n").expect("seed file");
    let path = display(&file);

    let (exit, stdout, _) = harness.run(&[
        "str_replace",
        &path,
        "--old-str",
        "y = 2",
        "--new-str",
        "y = 3",
    ]);
    assert_eq!(exit, ExitCode::SUCCESS);
    assert!(stdout.contains("     2\ty = 3"), "{stdout}");
    assert_eq!(fs::read_to_string(&file).expect("read"), "x = 1\ny = 3\n");
}

#[rstest]
fn editor_errors_are_printed_and_fail(harness: Harness) {
    let path = display(&harness.path("missing.txt"));
    let (exit, stdout, stderr) = harness.run(&["view", &path]);
    assert_eq!(exit, ExitCode::FAILURE);
    assert!(stdout.starts_with("ERROR:\n"), "{stdout}");
    assert!(stderr.is_empty(), "{stderr}");
}

#[rstest]
fn raw_output_is_an_extractable_envelope(harness: Harness) {
    let path = display(&harness.path("raw.txt"));
    let (exit, stdout, _) = harness.run(&["--raw", "create", &path, "--file-text", "hi"]);
    assert_eq!(exit, ExitCode::SUCCESS);
    assert!(stdout.starts_with("<quill_output_"), "{stdout}");

    let payload = envelope::extract(&stdout).expect("envelope");
    assert_eq!(payload.get("path"), Some(&serde_json::json!(path)));
    assert_eq!(payload.get("prev_exist"), Some(&serde_json::json!(false)));
    assert_eq!(payload.get("new_content"), Some(&serde_json::json!("hi")));
}

#[rstest]
fn usage_errors_go_to_stderr(harness: Harness) {
    let (exit, stdout, stderr) = harness.run(&["rename", "/tmp/a.txt"]);
    assert_eq!(exit, ExitCode::FAILURE);
    assert!(stdout.is_empty());
    assert!(stderr.contains("unknown command `rename`"), "{stderr}");
}

#[rstest]
fn help_is_written_to_stdout(harness: Harness) {
    let (exit, stdout, stderr) = harness.run(&["--help"]);
    assert_eq!(exit, ExitCode::SUCCESS);
    assert!(stdout.contains("Usage:"), "{stdout}");
    assert!(stderr.is_empty());
}

#[rstest]
fn config_flags_are_not_parsed_as_command_arguments() {
    let args: Vec<OsString> = ["quill", "--log-format", "json", "view", "/ws"]
        .into_iter()
        .map(OsString::from)
        .collect();
    let split = split_config_arguments(&args);
    let cli_arguments = prepare_cli_arguments(&args, &split);
    assert_eq!(
        cli_arguments,
        ["quill", "view", "/ws"]
            .into_iter()
            .map(OsString::from)
            .collect::<Vec<_>>()
    );
}
