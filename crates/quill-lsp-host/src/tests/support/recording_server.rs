//! Recording language server used in tests.

use std::sync::{Arc, Mutex};

use lsp_types::{
    DidChangeTextDocumentParams, DidOpenTextDocumentParams, GotoDefinitionParams,
    GotoDefinitionResponse, Hover, HoverParams, Location, ReferenceParams,
};

use crate::server::{LanguageServer, LanguageServerError, ServerCapabilitySet};

/// Calls observed by the stub server, with the payload worth asserting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallKind {
    /// `initialize` was invoked.
    Initialise,
    /// `textDocument/definition` was invoked.
    Definition,
    /// `textDocument/references` was invoked.
    References,
    /// `textDocument/hover` was invoked.
    Hover,
    /// `textDocument/didOpen` with the document version.
    DidOpen(i32),
    /// `textDocument/didChange` with the document version and new text.
    DidChange(i32, String),
}

/// Static responses returned by the stub server.
#[derive(Debug, Clone)]
pub struct ResponseSet {
    pub definition: GotoDefinitionResponse,
    pub references: Vec<Location>,
    pub hover: Option<Hover>,
}

impl Default for ResponseSet {
    fn default() -> Self {
        Self {
            definition: GotoDefinitionResponse::Array(Vec::new()),
            references: Vec::new(),
            hover: None,
        }
    }
}

#[derive(Debug)]
struct RecordingState {
    capabilities: ServerCapabilitySet,
    responses: ResponseSet,
    calls: Vec<CallKind>,
    initialised: bool,
    fail_initialise: Option<String>,
}

/// Test double that records every call routed through it.
#[derive(Clone)]
pub struct RecordingLanguageServer {
    shared: Arc<Mutex<RecordingState>>,
}

impl RecordingLanguageServer {
    pub fn new(capabilities: ServerCapabilitySet, responses: ResponseSet) -> Self {
        Self::build(capabilities, responses, None)
    }

    pub fn failing_initialize(message: &str) -> Self {
        Self::build(
            ServerCapabilitySet::default(),
            ResponseSet::default(),
            Some(message.to_owned()),
        )
    }

    fn build(
        capabilities: ServerCapabilitySet,
        responses: ResponseSet,
        fail_initialise: Option<String>,
    ) -> Self {
        Self {
            shared: Arc::new(Mutex::new(RecordingState {
                capabilities,
                responses,
                calls: Vec::new(),
                initialised: false,
                fail_initialise,
            })),
        }
    }

    /// Ordered list of calls observed so far, shared across clones.
    pub fn calls(&self) -> Vec<CallKind> {
        self.with_state(|state| state.calls.clone())
    }

    fn with_state<R>(&self, action: impl FnOnce(&mut RecordingState) -> R) -> R {
        let mut guard = self
            .shared
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());
        action(&mut guard)
    }

    fn record<R>(
        &self,
        call: CallKind,
        respond: impl FnOnce(&ResponseSet) -> R,
    ) -> Result<R, LanguageServerError> {
        self.with_state(|state| {
            let name = format!("{call:?}");
            state.calls.push(call);
            if !state.initialised {
                return Err(LanguageServerError::new(format!(
                    "{name} requested before initialisation"
                )));
            }
            Ok(respond(&state.responses))
        })
    }
}

impl LanguageServer for RecordingLanguageServer {
    fn initialize(&mut self) -> Result<ServerCapabilitySet, LanguageServerError> {
        self.with_state(|state| {
            state.calls.push(CallKind::Initialise);
            if let Some(message) = &state.fail_initialise {
                return Err(LanguageServerError::new(message.clone()));
            }
            state.initialised = true;
            Ok(state.capabilities)
        })
    }

    fn goto_definition(
        &mut self,
        _params: GotoDefinitionParams,
    ) -> Result<GotoDefinitionResponse, LanguageServerError> {
        self.record(CallKind::Definition, |responses| responses.definition.clone())
    }

    fn references(&mut self, _params: ReferenceParams) -> Result<Vec<Location>, LanguageServerError> {
        self.record(CallKind::References, |responses| responses.references.clone())
    }

    fn hover(&mut self, _params: HoverParams) -> Result<Option<Hover>, LanguageServerError> {
        self.record(CallKind::Hover, |responses| responses.hover.clone())
    }

    fn did_open(&mut self, params: DidOpenTextDocumentParams) -> Result<(), LanguageServerError> {
        self.record(CallKind::DidOpen(params.text_document.version), |_| ())
    }

    fn did_change(
        &mut self,
        params: DidChangeTextDocumentParams,
    ) -> Result<(), LanguageServerError> {
        let text = params
            .content_changes
            .into_iter()
            .map(|change| change.text)
            .collect();
        self.record(CallKind::DidChange(params.text_document.version, text), |_| ())
    }
}
