//! Error types surfaced by the LSP host facade.

use std::fmt;

use thiserror::Error;

use crate::language::Language;
use crate::server::{CapabilityKind, LanguageServerError};

/// Operation being executed when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOperation {
    /// Server initialisation handshake.
    Initialise,
    /// `textDocument/definition` handling.
    Definition,
    /// `textDocument/references` handling.
    References,
    /// `textDocument/hover` handling.
    Hover,
    /// `textDocument/didOpen` notification.
    DidOpen,
    /// `textDocument/didChange` notification.
    DidChange,
}

impl fmt::Display for HostOperation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Initialise => "initialisation",
            Self::Definition => "definition",
            Self::References => "references",
            Self::Hover => "hover",
            Self::DidOpen => "didOpen",
            Self::DidChange => "didChange",
        };
        formatter.write_str(label)
    }
}

/// Errors returned by [`crate::LspHost`].
#[derive(Debug, Error)]
pub enum LspHostError {
    /// The requested language has not been registered.
    #[error("language '{language}' is not registered with the LSP host")]
    UnknownLanguage {
        /// Language requested by the caller.
        language: Language,
    },

    /// The language has already been registered.
    #[error("language '{language}' already has a registered server")]
    DuplicateLanguage {
        /// Language for which a duplicate server was registered.
        language: Language,
    },

    /// The server did not advertise the requested capability.
    #[error("the {language} language server does not support {capability}")]
    CapabilityUnavailable {
        /// Language associated with the capability.
        language: Language,
        /// Capability that was requested.
        capability: CapabilityKind,
    },

    /// Underlying language server returned an error.
    #[error("language server for {language} failed during {operation}: {source}")]
    Server {
        /// Language associated with the server.
        language: Language,
        /// Operation that failed.
        operation: HostOperation,
        /// Underlying error.
        #[source]
        source: LanguageServerError,
    },
}

impl LspHostError {
    pub(crate) const fn unknown(language: Language) -> Self {
        Self::UnknownLanguage { language }
    }

    pub(crate) const fn duplicate(language: Language) -> Self {
        Self::DuplicateLanguage { language }
    }

    pub(crate) const fn capability_unavailable(
        language: Language,
        capability: CapabilityKind,
    ) -> Self {
        Self::CapabilityUnavailable {
            language,
            capability,
        }
    }

    pub(crate) const fn server(
        language: Language,
        operation: HostOperation,
        source: LanguageServerError,
    ) -> Self {
        Self::Server {
            language,
            operation,
            source,
        }
    }

    /// Whether the failure means no server can answer for this language,
    /// as opposed to a server that answered with an error.
    ///
    /// Callers use this to decide whether a fallback strategy applies.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::UnknownLanguage { .. }
                | Self::CapabilityUnavailable { .. }
                | Self::Server {
                    operation: HostOperation::Initialise,
                    ..
                }
        )
    }
}
