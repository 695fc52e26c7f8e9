//! Host facade that mediates access to per-language servers.

use std::collections::HashMap;

use lsp_types::{
    DidChangeTextDocumentParams, DidOpenTextDocumentParams, GotoDefinitionParams,
    GotoDefinitionResponse, Hover, HoverParams, Location, ReferenceParams,
    TextDocumentContentChangeEvent, TextDocumentItem, Uri, VersionedTextDocumentIdentifier,
};
use tracing::debug;

use crate::errors::{HostOperation, LspHostError};
use crate::language::Language;
use crate::server::{CapabilityKind, LanguageServer, LanguageServerError, ServerCapabilitySet};

const HOST_TARGET: &str = "quill_lsp_host::host";

struct Session {
    server: Box<dyn LanguageServer>,
    state: SessionState,
    /// Versions of documents already sent with `didOpen`, keyed by URI.
    documents: HashMap<String, i32>,
}

enum SessionState {
    Pending,
    Ready { capabilities: ServerCapabilitySet },
}

struct CallContext {
    language: Language,
    capability: CapabilityKind,
    operation: HostOperation,
}

/// Routes navigation requests to the server registered for each language.
///
/// Servers are initialised lazily on their first request. A failed handshake
/// leaves the session pending so a later request retries it.
#[derive(Default)]
pub struct LspHost {
    sessions: HashMap<Language, Session>,
}

impl LspHost {
    /// Builds a host with no registered servers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a server for the given language.
    ///
    /// # Errors
    ///
    /// Returns [`LspHostError::DuplicateLanguage`] if a server is already
    /// registered for `language`.
    pub fn register_language(
        &mut self,
        language: Language,
        server: Box<dyn LanguageServer>,
    ) -> Result<(), LspHostError> {
        if self.sessions.contains_key(&language) {
            return Err(LspHostError::duplicate(language));
        }

        self.sessions.insert(
            language,
            Session {
                server,
                state: SessionState::Pending,
                documents: HashMap::new(),
            },
        );
        Ok(())
    }

    /// Whether a server is registered for `language`.
    #[must_use]
    pub fn is_registered(&self, language: Language) -> bool {
        self.sessions.contains_key(&language)
    }

    /// Initialises the server for `language` if needed and returns its capabilities.
    ///
    /// # Errors
    ///
    /// Fails when no server is registered or the handshake fails.
    pub fn initialise(&mut self, language: Language) -> Result<ServerCapabilitySet, LspHostError> {
        let session = self.session_mut(language)?;
        Self::ensure_initialised(language, session)
    }

    /// Returns the capabilities of an already initialised server.
    #[must_use]
    pub fn capabilities(&self, language: Language) -> Option<ServerCapabilitySet> {
        self.sessions
            .get(&language)
            .and_then(|session| match session.state {
                SessionState::Ready { capabilities } => Some(capabilities),
                SessionState::Pending => None,
            })
    }

    /// Sends the document text to the server: `didOpen` the first time a
    /// URI is seen, `didChange` with the next version afterwards.
    ///
    /// # Errors
    ///
    /// Fails when no server is registered, the handshake fails, or the
    /// notification cannot be delivered.
    pub fn sync_document(
        &mut self,
        language: Language,
        uri: Uri,
        text: String,
    ) -> Result<(), LspHostError> {
        let session = self.session_mut(language)?;
        Self::ensure_initialised(language, session)?;

        let key = uri.as_str().to_owned();
        if let Some(version) = session.documents.get_mut(&key) {
            *version = version.saturating_add(1);
            let params = DidChangeTextDocumentParams {
                text_document: VersionedTextDocumentIdentifier {
                    uri,
                    version: *version,
                },
                content_changes: vec![TextDocumentContentChangeEvent {
                    range: None,
                    range_length: None,
                    text,
                }],
            };
            debug!(target: HOST_TARGET, %language, uri = %key, version = *version, "didChange");
            return session
                .server
                .did_change(params)
                .map_err(|source| LspHostError::server(language, HostOperation::DidChange, source));
        }

        let params = DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri,
                language_id: language.as_str().to_owned(),
                version: 1,
                text,
            },
        };
        debug!(target: HOST_TARGET, %language, uri = %key, "didOpen");
        session
            .server
            .did_open(params)
            .map_err(|source| LspHostError::server(language, HostOperation::DidOpen, source))?;
        session.documents.insert(key, 1);
        Ok(())
    }

    /// Routes a definition request to the configured language server.
    ///
    /// # Errors
    ///
    /// Fails when the server is missing, lacks the capability, or errors.
    pub fn goto_definition(
        &mut self,
        language: Language,
        params: GotoDefinitionParams,
    ) -> Result<GotoDefinitionResponse, LspHostError> {
        let context = CallContext {
            language,
            capability: CapabilityKind::Definition,
            operation: HostOperation::Definition,
        };
        self.call_with_capability(&context, move |server| server.goto_definition(params))
    }

    /// Routes a references request to the configured language server.
    ///
    /// # Errors
    ///
    /// Fails when the server is missing, lacks the capability, or errors.
    pub fn references(
        &mut self,
        language: Language,
        params: ReferenceParams,
    ) -> Result<Vec<Location>, LspHostError> {
        let context = CallContext {
            language,
            capability: CapabilityKind::References,
            operation: HostOperation::References,
        };
        self.call_with_capability(&context, move |server| server.references(params))
    }

    /// Routes a hover request to the configured language server.
    ///
    /// # Errors
    ///
    /// Fails when the server is missing, lacks the capability, or errors.
    pub fn hover(
        &mut self,
        language: Language,
        params: HoverParams,
    ) -> Result<Option<Hover>, LspHostError> {
        let context = CallContext {
            language,
            capability: CapabilityKind::Hover,
            operation: HostOperation::Hover,
        };
        self.call_with_capability(&context, move |server| server.hover(params))
    }

    fn call_with_capability<F, T>(
        &mut self,
        context: &CallContext,
        call: F,
    ) -> Result<T, LspHostError>
    where
        F: FnOnce(&mut dyn LanguageServer) -> Result<T, LanguageServerError>,
    {
        let session = self.session_mut(context.language)?;
        let capabilities = Self::ensure_initialised(context.language, session)?;
        if !capabilities.supports(context.capability) {
            return Err(LspHostError::capability_unavailable(
                context.language,
                context.capability,
            ));
        }

        call(session.server.as_mut())
            .map_err(|source| LspHostError::server(context.language, context.operation, source))
    }

    fn ensure_initialised(
        language: Language,
        session: &mut Session,
    ) -> Result<ServerCapabilitySet, LspHostError> {
        match session.state {
            SessionState::Ready { capabilities } => Ok(capabilities),
            SessionState::Pending => {
                let capabilities = session.server.initialize().map_err(|source| {
                    LspHostError::server(language, HostOperation::Initialise, source)
                })?;
                debug!(target: HOST_TARGET, %language, ?capabilities, "server initialised");
                session.state = SessionState::Ready { capabilities };
                Ok(capabilities)
            }
        }
    }

    fn session_mut(&mut self, language: Language) -> Result<&mut Session, LspHostError> {
        self.sessions
            .get_mut(&language)
            .ok_or(LspHostError::unknown(language))
    }
}

impl std::fmt::Debug for LspHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LspHost")
            .field("languages", &self.sessions.keys().collect::<Vec<_>>())
            .finish()
    }
}
