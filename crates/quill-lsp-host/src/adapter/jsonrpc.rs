//! JSON-RPC 2.0 message types for LSP communication.

use serde::{Deserialize, Serialize};
use serde_json::Value;

const JSONRPC_VERSION: &str = "2.0";

/// A request sent to the server.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    /// Protocol version, always "2.0".
    pub jsonrpc: &'static str,
    /// Request identifier.
    pub id: i64,
    /// Method to invoke.
    pub method: String,
    /// Optional parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Creates a request with the given identifier.
    #[must_use]
    pub fn new(id: i64, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method: method.into(),
            params,
        }
    }
}

/// A notification sent to the server; no response is expected.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcNotification {
    /// Protocol version, always "2.0".
    pub jsonrpc: &'static str,
    /// Method to invoke.
    pub method: String,
    /// Optional parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcNotification {
    /// Creates a notification.
    #[must_use]
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method: method.into(),
            params,
        }
    }
}

/// A null-result reply to a server-initiated request.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcReply {
    /// Protocol version, always "2.0".
    pub jsonrpc: &'static str,
    /// Identifier of the server request being answered.
    pub id: Value,
    /// Always `null`.
    pub result: Value,
}

impl JsonRpcReply {
    /// Acknowledges the server request `id` without a payload.
    #[must_use]
    pub const fn null(id: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: Value::Null,
        }
    }
}

/// A response received from the server.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    /// Identifier of the request this answers.
    pub id: Option<i64>,
    /// Result on success.
    #[serde(default)]
    pub result: Option<Value>,
    /// Error on failure.
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// A JSON-RPC error object.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    /// Error code.
    pub code: i64,
    /// Human-readable message.
    pub message: String,
}

/// Any message the server may send.
#[derive(Debug, Clone)]
pub enum JsonRpcMessage {
    /// Answer to one of our requests.
    Response(JsonRpcResponse),
    /// A request initiated by the server, such as `workspace/configuration`.
    ServerRequest {
        /// Server-chosen identifier, a number or a string.
        id: Value,
        /// Requested method.
        method: String,
    },
    /// A notification such as `window/logMessage`.
    Notification {
        /// Notified method.
        method: String,
    },
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    method: Option<String>,
}

impl JsonRpcMessage {
    /// Classifies a raw message body.
    ///
    /// # Errors
    ///
    /// Returns the decoding error if the body is not a JSON-RPC object.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let envelope: Envelope = serde_json::from_slice(bytes)?;
        match (envelope.method, envelope.id) {
            (Some(method), Some(id)) => Ok(Self::ServerRequest { id, method }),
            (Some(method), None) => Ok(Self::Notification { method }),
            (None, _) => serde_json::from_slice(bytes).map(Self::Response),
        }
    }
}
