//! Process-based language server adapter.
//!
//! [`ProcessLanguageServer`] spawns a configured server binary and speaks
//! JSON-RPC 2.0 to it over stdio, framing each message with a
//! `Content-Length` header. It implements [`LanguageServer`](crate::LanguageServer)
//! so it can be registered with [`LspHost`](crate::LspHost).
//!
//! - [`LspServerConfig`]: command line and working directory per language
//! - [`AdapterError`] and [`TransportError`]: adapter and framing failures
//! - [`JsonRpcRequest`], [`JsonRpcNotification`], [`JsonRpcResponse`],
//!   [`JsonRpcMessage`]: wire messages
//! - [`FramedTransport`]: header framing over any reader and writer pair

mod config;
mod error;
mod jsonrpc;
mod lifecycle;
mod messaging;
mod process;
mod state;
mod trait_impl;
mod transport;

pub use config::LspServerConfig;
pub use error::{AdapterError, TransportError};
pub use jsonrpc::{
    JsonRpcError, JsonRpcMessage, JsonRpcNotification, JsonRpcReply, JsonRpcRequest,
    JsonRpcResponse,
};
pub use process::ProcessLanguageServer;
pub use transport::{FramedTransport, StdioTransport};
