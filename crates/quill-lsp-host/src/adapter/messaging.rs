//! Request/response exchange over a framed transport.

use std::io::{BufRead, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::AdapterError;
use super::jsonrpc::{
    JsonRpcMessage, JsonRpcNotification, JsonRpcReply, JsonRpcRequest, JsonRpcResponse,
};
use super::lifecycle::ADAPTER_TARGET;
use super::transport::FramedTransport;

/// Unrelated messages tolerated while waiting for one response.
const MAX_RESPONSE_ITERATIONS: usize = 100;

/// Sends request `id` and returns its successful response.
pub(super) fn send_request_raw<R, W, P>(
    transport: &mut FramedTransport<R, W>,
    id: i64,
    method: &str,
    params: P,
) -> Result<JsonRpcResponse, AdapterError>
where
    R: BufRead,
    W: Write,
    P: Serialize,
{
    let request = JsonRpcRequest::new(id, method, Some(serde_json::to_value(params)?));
    debug!(target: ADAPTER_TARGET, method, id, "sending request");
    transport.send(&serde_json::to_vec(&request)?)?;

    let response = receive_response_for_request(transport, id)?;
    match response.error {
        Some(error) => Err(AdapterError::from_jsonrpc(error)),
        None => Ok(response),
    }
}

/// Sends a request whose result must be present.
pub(super) fn send_request<R, W, P, T>(
    transport: &mut FramedTransport<R, W>,
    id: i64,
    method: &str,
    params: P,
) -> Result<T, AdapterError>
where
    R: BufRead,
    W: Write,
    P: Serialize,
    T: DeserializeOwned,
{
    send_request_optional(transport, id, method, params)?.ok_or_else(|| {
        AdapterError::EmptyResult {
            method: method.to_owned(),
        }
    })
}

/// Sends a request for which `null` is a valid result.
pub(super) fn send_request_optional<R, W, P, T>(
    transport: &mut FramedTransport<R, W>,
    id: i64,
    method: &str,
    params: P,
) -> Result<Option<T>, AdapterError>
where
    R: BufRead,
    W: Write,
    P: Serialize,
    T: DeserializeOwned,
{
    match send_request_raw(transport, id, method, params)?.result {
        Some(Value::Null) | None => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
    }
}

/// Sends a notification.
pub(super) fn send_notification<R, W, P>(
    transport: &mut FramedTransport<R, W>,
    method: &str,
    params: P,
) -> Result<(), AdapterError>
where
    R: BufRead,
    W: Write,
    P: Serialize,
{
    let notification = JsonRpcNotification::new(method, Some(serde_json::to_value(params)?));
    debug!(target: ADAPTER_TARGET, method, "sending notification");
    transport.send(&serde_json::to_vec(&notification)?)?;
    Ok(())
}

/// Reads messages until the response to `request_id` arrives.
///
/// Notifications are skipped and server requests are acknowledged with a
/// `null` result so the server does not stall waiting for the client.
fn receive_response_for_request<R: BufRead, W: Write>(
    transport: &mut FramedTransport<R, W>,
    request_id: i64,
) -> Result<JsonRpcResponse, AdapterError> {
    for _ in 0..MAX_RESPONSE_ITERATIONS {
        let bytes = transport.receive()?;
        match JsonRpcMessage::from_bytes(&bytes)? {
            JsonRpcMessage::Response(response) if response.id == Some(request_id) => {
                return Ok(response);
            }
            JsonRpcMessage::Response(response) => {
                warn!(
                    target: ADAPTER_TARGET,
                    expected = request_id,
                    received = ?response.id,
                    "skipping response with non-matching ID"
                );
            }
            JsonRpcMessage::ServerRequest { id, method } => {
                debug!(target: ADAPTER_TARGET, %method, "acknowledging server request");
                transport.send(&serde_json::to_vec(&JsonRpcReply::null(id))?)?;
            }
            JsonRpcMessage::Notification { method } => {
                debug!(target: ADAPTER_TARGET, %method, "skipping server notification");
            }
        }
    }

    warn!(
        target: ADAPTER_TARGET,
        request_id,
        max_iterations = MAX_RESPONSE_ITERATIONS,
        "giving up on response after reaching maximum iterations"
    );
    Err(AdapterError::MaxResponseIterations { request_id })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn frame(body: &str) -> Vec<u8> {
        format!("Content-Length: {}\r\n\r\n{body}", body.len()).into_bytes()
    }

    fn scripted(bodies: &[&str]) -> FramedTransport<Cursor<Vec<u8>>, Vec<u8>> {
        let input: Vec<u8> = bodies.iter().flat_map(|body| frame(body)).collect();
        FramedTransport::new(Cursor::new(input), Vec::new())
    }

    fn written_bodies(transport: FramedTransport<Cursor<Vec<u8>>, Vec<u8>>) -> Vec<Value> {
        let written = transport.into_writer();
        let mut reader = FramedTransport::new(Cursor::new(written), Vec::new());
        let mut bodies = Vec::new();
        while let Ok(body) = reader.receive() {
            bodies.push(serde_json::from_slice(&body).expect("json body"));
        }
        bodies
    }

    #[rstest]
    fn skips_notifications_and_answers_server_requests() {
        let mut transport = scripted(&[
            r#"{"jsonrpc":"2.0","method":"window/logMessage","params":{"type":3,"message":"hi"}}"#,
            r#"{"jsonrpc":"2.0","id":"cfg","method":"workspace/configuration","params":{}}"#,
            r#"{"jsonrpc":"2.0","id":99,"result":"stale"}"#,
            r#"{"jsonrpc":"2.0","id":4,"result":{"value":42}}"#,
        ]);

        let result: Value =
            send_request(&mut transport, 4, "custom/ping", json!({})).expect("response");
        assert_eq!(result, json!({"value": 42}));

        let sent = written_bodies(transport);
        assert_eq!(sent.len(), 2);
        assert_eq!(sent.first().and_then(|body| body.get("method")), Some(&json!("custom/ping")));
        assert_eq!(
            sent.get(1),
            Some(&json!({"jsonrpc": "2.0", "id": "cfg", "result": null}))
        );
    }

    #[rstest]
    fn null_result_is_none_for_optional_requests() {
        let mut transport = scripted(&[r#"{"jsonrpc":"2.0","id":1,"result":null}"#]);
        let result: Option<Value> =
            send_request_optional(&mut transport, 1, "textDocument/hover", json!({}))
                .expect("response");
        assert!(result.is_none());
    }

    #[rstest]
    fn null_result_is_an_error_for_required_requests() {
        let mut transport = scripted(&[r#"{"jsonrpc":"2.0","id":1,"result":null}"#]);
        let result: Result<Value, _> = send_request(&mut transport, 1, "initialize", json!({}));
        assert!(matches!(result, Err(AdapterError::EmptyResult { .. })));
    }

    #[rstest]
    fn server_errors_are_surfaced() {
        let mut transport = scripted(&[
            r#"{"jsonrpc":"2.0","id":2,"error":{"code":-32601,"message":"unknown method"}}"#,
        ]);
        let result: Result<Value, _> = send_request(&mut transport, 2, "bogus", json!({}));
        assert!(matches!(
            result,
            Err(AdapterError::ServerError { code: -32601, .. })
        ));
    }

    #[rstest]
    fn gives_up_after_too_many_unrelated_messages() {
        let noise = r#"{"jsonrpc":"2.0","method":"$/progress","params":{}}"#;
        let bodies = vec![noise; MAX_RESPONSE_ITERATIONS];
        let mut transport = scripted(&bodies);
        let result: Result<Value, _> = send_request(&mut transport, 5, "slow", json!({}));
        assert!(matches!(
            result,
            Err(AdapterError::MaxResponseIterations { request_id: 5 })
        ));
    }

    #[rstest]
    fn notifications_are_framed_without_id() {
        let mut transport = scripted(&[]);
        send_notification(&mut transport, "initialized", json!({})).expect("notify");
        let sent = written_bodies(transport);
        assert_eq!(
            sent,
            vec![json!({"jsonrpc": "2.0", "method": "initialized", "params": {}})]
        );
    }
}
