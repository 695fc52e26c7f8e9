//! Language Server Protocol host for quill's navigation commands.
//!
//! The crate owns the lifecycle of per-language servers and exposes the three
//! requests the editor needs: definition, references and hover. Servers sit
//! behind the [`LanguageServer`] trait so tests can inject lightweight doubles
//! without spawning processes; [`adapter::ProcessLanguageServer`] is the real
//! implementation, speaking JSON-RPC over a child process's stdio.
//!
//! Only one navigation session may be active per editor. [`SessionGate`]
//! enforces that rule with an RAII [`SessionGuard`].

pub mod adapter;
mod errors;
mod host;
mod language;
mod server;
mod session;
mod uri;

pub use errors::{HostOperation, LspHostError};
pub use host::LspHost;
pub use language::{Language, LanguageParseError};
pub use server::{CapabilityKind, LanguageServer, LanguageServerError, ServerCapabilitySet};
pub use session::{SessionBusy, SessionGate, SessionGuard};
pub use uri::{UriError, path_to_uri, uri_to_path};

#[cfg(test)]
mod tests;
