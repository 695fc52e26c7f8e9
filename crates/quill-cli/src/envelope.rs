//! Tagged JSON framing for command results.
//!
//! Agents receive tool output mixed with free-form text. Wrapping the
//! serialised [`ToolResult`] in a tag carrying a random identifier lets a
//! caller cut the payload back out without guessing where it ends.

use quill_editor::ToolResult;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// Prefix shared by the opening and closing tags.
pub const TAG_PREFIX: &str = "quill_output";

#[derive(Serialize)]
struct Envelope<'a> {
    #[serde(flatten)]
    result: &'a ToolResult,
    formatted_output_and_error: String,
}

/// Serialises `result` between `<quill_output_{id}>` tags.
///
/// # Errors
///
/// Returns the serialiser error if the result cannot be encoded.
pub fn render(result: &ToolResult) -> Result<String, serde_json::Error> {
    let tag = format!("{TAG_PREFIX}_{}", Uuid::new_v4().simple());
    let body = serde_json::to_string_pretty(&Envelope {
        result,
        formatted_output_and_error: result.formatted_output_and_error(),
    })?;
    Ok(format!("<{tag}>\n{body}\n</{tag}>"))
}

/// Recovers the first well-formed envelope payload embedded in `text`.
#[must_use]
pub fn extract(text: &str) -> Option<Value> {
    let opening = format!("<{TAG_PREFIX}_");
    let mut remaining = text;
    while let Some((_, after)) = remaining.split_once(opening.as_str()) {
        if let Some(payload) = parse_tagged(after) {
            return Some(payload);
        }
        remaining = after;
    }
    None
}

/// Parses `{id}>{json}</quill_output_{id}>`.
fn parse_tagged(text: &str) -> Option<Value> {
    let (id, rest) = text.split_once('>')?;
    if id.len() != 32 || !id.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return None;
    }
    let closing = format!("</{TAG_PREFIX}_{id}>");
    let (body, _) = rest.split_once(closing.as_str())?;
    serde_json::from_str(body.trim()).ok()
}
