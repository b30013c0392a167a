use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default = "default_tool_type")]
    pub tool_type: String,
    pub function: FunctionCall,
    /// Set when the entry could not be decoded; the call is reported as a
    /// failed outcome instead of being executed.
    #[serde(skip)]
    pub malformed: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded argument object. Some OpenAI-compatible backends send the
    /// object inline instead of as a string, so both shapes are accepted.
    #[serde(default)]
    pub arguments: Value,
}

fn default_tool_type() -> String {
    "function".to_string()
}

impl ToolCall {
    /// Salvage the id and name of an entry that failed to decode.
    pub fn malformed(raw: &Value, error: impl Into<String>) -> Self {
        Self {
            id: raw.get("id").and_then(|v| v.as_str()).map(str::to_string),
            tool_type: default_tool_type(),
            function: FunctionCall {
                name: raw
                    .pointer("/function/name")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
                arguments: Value::String("{}".to_string()),
            },
            malformed: Some(error.into()),
        }
    }
}

impl FunctionCall {
    /// Decode the argument payload into a JSON value.
    ///
    /// An empty or missing payload is treated as `{}`.
    pub fn parsed_arguments(&self) -> Result<Value, serde_json::Error> {
        match &self.arguments {
            Value::String(raw) if raw.trim().is_empty() => Ok(Value::Object(Default::default())),
            Value::String(raw) => serde_json::from_str(raw),
            Value::Null => Ok(Value::Object(Default::default())),
            other => Ok(other.clone()),
        }
    }

    /// Re-encode the payload as a JSON string, the shape the chat API
    /// expects when the call is echoed back in an assistant message.
    pub fn encode_arguments(&mut self) {
        let encoded = match &self.arguments {
            Value::String(_) => return,
            Value::Null => "{}".to_string(),
            other => other.to_string(),
        };
        self.arguments = Value::String(encoded);
    }

    /// Short single-line preview of the raw arguments for logs.
    pub fn arguments_preview(&self) -> String {
        let raw = match &self.arguments {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if raw.chars().count() > 100 {
            let head: String = raw.chars().take(100).collect();
            format!("{}...", head)
        } else {
            raw
        }
    }
}
