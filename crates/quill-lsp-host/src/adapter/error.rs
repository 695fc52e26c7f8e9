//! Error types for the process adapter.

use std::io;

use thiserror::Error;

use super::jsonrpc::JsonRpcError;

/// Errors raised while driving a language server process.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The server executable could not be found.
    #[error("language server binary not found: {command}")]
    BinaryNotFound {
        /// Command that was not found.
        command: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The process could not be started.
    #[error("failed to spawn language server process: {message}")]
    SpawnFailed {
        /// Description of the failure.
        message: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Framing or pipe failure.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A message could not be encoded or decoded.
    #[error("JSON codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The server answered with a JSON-RPC error.
    #[error("server returned error: {message} (code: {code})")]
    ServerError {
        /// JSON-RPC error code.
        code: i64,
        /// Error message from the server.
        message: String,
    },

    /// The server answered a request with no result.
    #[error("empty result for {method}")]
    EmptyResult {
        /// Method whose result was missing.
        method: String,
    },

    /// Too many unrelated messages arrived before the expected response.
    #[error("no response to request {request_id} after skipping interleaved messages")]
    MaxResponseIterations {
        /// Request still awaiting a response.
        request_id: i64,
    },

    /// The process is not running.
    #[error("language server process is not running")]
    ProcessExited,
}

impl AdapterError {
    /// Creates a server error from a JSON-RPC error object.
    #[must_use]
    pub fn from_jsonrpc(error: JsonRpcError) -> Self {
        Self::ServerError {
            code: error.code,
            message: error.message,
        }
    }
}

/// Framing errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Read or write failure on the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A header block ended without `Content-Length`.
    #[error("missing Content-Length header")]
    MissingContentLength,

    /// A `Content-Length` value was not a number.
    #[error("invalid header format")]
    InvalidHeader,
}
