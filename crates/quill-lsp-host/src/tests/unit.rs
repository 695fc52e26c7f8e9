//! Host routing, lazy initialisation and document synchronisation.

use std::str::FromStr;

use lsp_types::{
    GotoDefinitionParams, GotoDefinitionResponse, Hover, HoverContents, HoverParams, Location,
    MarkupContent, MarkupKind, PartialResultParams, Position, Range, ReferenceContext,
    ReferenceParams, TextDocumentIdentifier, TextDocumentPositionParams, Uri,
    WorkDoneProgressParams,
};
use rstest::{fixture, rstest};

use crate::errors::{HostOperation, LspHostError};
use crate::language::Language;
use crate::server::{CapabilityKind, ServerCapabilitySet};
use crate::tests::support::{CallKind, RecordingLanguageServer, ResponseSet};
use crate::LspHost;

fn uri() -> Uri {
    Uri::from_str("file:///workspace/src/lib.rs").expect("valid uri")
}

fn position() -> TextDocumentPositionParams {
    TextDocumentPositionParams {
        text_document: TextDocumentIdentifier { uri: uri() },
        position: Position::new(3, 7),
    }
}

fn definition_params() -> GotoDefinitionParams {
    GotoDefinitionParams {
        text_document_position_params: position(),
        work_done_progress_params: WorkDoneProgressParams::default(),
        partial_result_params: PartialResultParams::default(),
    }
}

fn reference_params() -> ReferenceParams {
    ReferenceParams {
        text_document_position: position(),
        work_done_progress_params: WorkDoneProgressParams::default(),
        partial_result_params: PartialResultParams::default(),
        context: ReferenceContext {
            include_declaration: true,
        },
    }
}

fn hover_params() -> HoverParams {
    HoverParams {
        text_document_position_params: position(),
        work_done_progress_params: WorkDoneProgressParams::default(),
    }
}

fn location(line: u32) -> Location {
    Location::new(uri(), Range::new(Position::new(line, 0), Position::new(line, 4)))
}

#[fixture]
fn responses() -> ResponseSet {
    ResponseSet {
        definition: GotoDefinitionResponse::Scalar(location(1)),
        references: vec![location(1), location(9)],
        hover: Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::PlainText,
                value: "fn helper() -> u32".to_owned(),
            }),
            range: None,
        }),
    }
}

fn host_with(server: &RecordingLanguageServer) -> LspHost {
    let mut host = LspHost::new();
    host.register_language(Language::Rust, Box::new(server.clone()))
        .expect("register");
    host
}

#[rstest]
fn initialises_once_before_first_request(responses: ResponseSet) {
    let server = RecordingLanguageServer::new(ServerCapabilitySet::new(true, true, true), responses);
    let mut host = host_with(&server);
    assert!(host.capabilities(Language::Rust).is_none());

    let definition = host
        .goto_definition(Language::Rust, definition_params())
        .expect("definition");
    assert_eq!(definition, GotoDefinitionResponse::Scalar(location(1)));
    let references = host
        .references(Language::Rust, reference_params())
        .expect("references");
    assert_eq!(references.len(), 2);
    let hover = host.hover(Language::Rust, hover_params()).expect("hover");
    assert!(hover.is_some());

    assert_eq!(
        server.calls(),
        vec![
            CallKind::Initialise,
            CallKind::Definition,
            CallKind::References,
            CallKind::Hover,
        ]
    );
    assert!(host.capabilities(Language::Rust).is_some());
}

#[rstest]
fn missing_capability_is_rejected_without_calling_server(responses: ResponseSet) {
    let server =
        RecordingLanguageServer::new(ServerCapabilitySet::new(true, true, false), responses);
    let mut host = host_with(&server);

    let error = host
        .hover(Language::Rust, hover_params())
        .expect_err("hover unsupported");
    assert!(matches!(
        error,
        LspHostError::CapabilityUnavailable {
            capability: CapabilityKind::Hover,
            ..
        }
    ));
    assert!(error.is_unavailable());
    assert_eq!(server.calls(), vec![CallKind::Initialise]);
}

#[rstest]
fn unknown_language_is_unavailable() {
    let mut host = LspHost::new();
    let error = host
        .goto_definition(Language::Java, definition_params())
        .expect_err("nothing registered");
    assert!(matches!(error, LspHostError::UnknownLanguage { .. }));
    assert!(error.is_unavailable());
}

#[rstest]
fn failed_handshake_is_unavailable_and_retried() {
    let server = RecordingLanguageServer::failing_initialize("binary not found");
    let mut host = host_with(&server);

    for _ in 0..2 {
        let error = host
            .references(Language::Rust, reference_params())
            .expect_err("handshake fails");
        assert!(matches!(
            error,
            LspHostError::Server {
                operation: HostOperation::Initialise,
                ..
            }
        ));
        assert!(error.is_unavailable());
    }
    assert_eq!(server.calls(), vec![CallKind::Initialise, CallKind::Initialise]);
}

#[rstest]
fn duplicate_registration_is_rejected() {
    let server = RecordingLanguageServer::new(ServerCapabilitySet::default(), ResponseSet::default());
    let mut host = host_with(&server);
    let result = host.register_language(Language::Rust, Box::new(server));
    assert!(matches!(result, Err(LspHostError::DuplicateLanguage { .. })));
}

#[rstest]
fn documents_are_opened_once_then_changed_with_increasing_versions() {
    let server = RecordingLanguageServer::new(ServerCapabilitySet::default(), ResponseSet::default());
    let mut host = host_with(&server);

    host.sync_document(Language::Rust, uri(), "fn a() {}\n".to_owned())
        .expect("open");
    host.sync_document(Language::Rust, uri(), "fn b() {}\n".to_owned())
        .expect("change");
    host.sync_document(Language::Rust, uri(), "fn c() {}\n".to_owned())
        .expect("change");

    assert_eq!(
        server.calls(),
        vec![
            CallKind::Initialise,
            CallKind::DidOpen(1),
            CallKind::DidChange(2, "fn b() {}\n".to_owned()),
            CallKind::DidChange(3, "fn c() {}\n".to_owned()),
        ]
    );
}

#[rstest]
#[case("src/app.py", Some(Language::Python))]
#[case("stubs/app.pyi", Some(Language::Python))]
#[case("web/app.jsx", Some(Language::JavaScript))]
#[case("web/app.tsx", Some(Language::TypeScript))]
#[case("Main.java", Some(Language::Java))]
#[case("Program.cs", Some(Language::CSharp))]
#[case("src/lib.rs", Some(Language::Rust))]
#[case("notes.txt", None)]
fn languages_are_detected_from_extensions(
    #[case] path: &str,
    #[case] expected: Option<Language>,
) {
    assert_eq!(Language::from_path(std::path::Path::new(path)), expected);
}

#[rstest]
#[case("Rust", Language::Rust)]
#[case("c#", Language::CSharp)]
#[case(" ts ", Language::TypeScript)]
fn languages_parse_from_names(#[case] input: &str, #[case] expected: Language) {
    assert_eq!(Language::from_str(input), Ok(expected));
}
