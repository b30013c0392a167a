use crate::error::{Result, ToolcallError};
use crate::models::ToolCall;
use serde_json::Value;

fn first_message(response_json: &Value) -> Result<&Value> {
    let choices = response_json
        .get("choices")
        .and_then(|c| c.as_array())
        .ok_or_else(|| ToolcallError::model("No choices in response"))?;

    let first_choice = choices
        .first()
        .ok_or_else(|| ToolcallError::model("Empty choices array"))?;

    first_choice
        .get("message")
        .ok_or_else(|| ToolcallError::model("No message in response"))
}

/// Parse a chat-completion response and extract the requested tool calls,
/// in the order the model returned them.
///
/// An entry that fails to decode does not fail the response; it comes back
/// marked `malformed` so the calls around it still run.
pub fn parse_tool_calls(response_json: &Value) -> Result<Vec<ToolCall>> {
    let message = first_message(response_json)?;

    let Some(raw_calls) = message.get("tool_calls").and_then(|tc| tc.as_array()) else {
        return Ok(Vec::new());
    };

    Ok(raw_calls
        .iter()
        .map(|raw| {
            serde_json::from_value::<ToolCall>(raw.clone()).unwrap_or_else(|e| {
                tracing::debug!(entry = %raw, error = %e, "malformed tool call entry");
                ToolCall::malformed(raw, format!("malformed tool call: {}", e))
            })
        })
        .collect())
}

/// Extract the assistant's text content, if any.
pub fn extract_content(response_json: &Value) -> Result<Option<String>> {
    let message = first_message(response_json)?;

    Ok(message
        .get("content")
        .and_then(|c| c.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string()))
}
