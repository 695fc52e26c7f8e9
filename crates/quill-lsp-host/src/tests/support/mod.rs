//! Test doubles for the host.

mod recording_server;

pub use recording_server::{CallKind, RecordingLanguageServer, ResponseSet};
