//! Abstractions over concrete language server implementations.

use std::error::Error;
use std::fmt;

use lsp_types::{
    DidChangeTextDocumentParams, DidOpenTextDocumentParams, GotoDefinitionParams,
    GotoDefinitionResponse, Hover, HoverParams, Location, ReferenceParams,
};
use thiserror::Error;

/// Requests whose support the host checks before routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    /// `textDocument/definition`.
    Definition,
    /// `textDocument/references`.
    References,
    /// `textDocument/hover`.
    Hover,
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Definition => "definition",
            Self::References => "references",
            Self::Hover => "hover",
        })
    }
}

/// Capabilities a server advertised during initialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServerCapabilitySet {
    definition: bool,
    references: bool,
    hover: bool,
}

impl ServerCapabilitySet {
    /// Builds a capability set describing the server's advertised support.
    #[must_use]
    pub const fn new(definition: bool, references: bool, hover: bool) -> Self {
        Self {
            definition,
            references,
            hover,
        }
    }

    /// Whether the server supports `kind`.
    #[must_use]
    pub const fn supports(self, kind: CapabilityKind) -> bool {
        match kind {
            CapabilityKind::Definition => self.definition,
            CapabilityKind::References => self.references,
            CapabilityKind::Hover => self.hover,
        }
    }
}

/// Errors reported by language server implementations.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct LanguageServerError {
    message: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl LanguageServerError {
    /// Builds an error without an underlying source.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Builds an error that wraps an underlying source.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Human-friendly description without the optional source.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Behaviour required from concrete language server bindings.
///
/// Implementations are driven synchronously by [`crate::LspHost`]: the host
/// calls [`initialize`](Self::initialize) once, keeps the server informed of
/// document contents through the `did_*` notifications, and only issues a
/// request when the matching capability was advertised.
pub trait LanguageServer: Send {
    /// Runs the initialisation handshake and returns advertised capabilities.
    fn initialize(&mut self) -> Result<ServerCapabilitySet, LanguageServerError>;

    /// Handles a `textDocument/definition` request.
    fn goto_definition(
        &mut self,
        params: GotoDefinitionParams,
    ) -> Result<GotoDefinitionResponse, LanguageServerError>;

    /// Handles a `textDocument/references` request.
    fn references(&mut self, params: ReferenceParams) -> Result<Vec<Location>, LanguageServerError>;

    /// Handles a `textDocument/hover` request.
    fn hover(&mut self, params: HoverParams) -> Result<Option<Hover>, LanguageServerError>;

    /// Sends the full text of a newly opened document.
    fn did_open(&mut self, params: DidOpenTextDocumentParams) -> Result<(), LanguageServerError>;

    /// Sends the updated text of an already opened document.
    fn did_change(&mut self, params: DidChangeTextDocumentParams)
    -> Result<(), LanguageServerError>;
}

impl fmt::Debug for dyn LanguageServer {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("LanguageServer")
    }
}
