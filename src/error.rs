use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolcallError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid arguments for tool '{tool}': {message}")]
    SchemaValidation { tool: String, message: String },

    #[error("Tool '{0}' not found")]
    UnknownTool(String),

    #[error("Tool '{tool}' failed: {message}")]
    ToolExecution { tool: String, message: String },

    #[error("Model request failed{}: {message}", .status.map(|s| format!(" (status {})", s)).unwrap_or_default())]
    ModelRequest {
        status: Option<u16>,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ToolcallError {
    pub fn schema(tool: &str, message: impl Into<String>) -> Self {
        ToolcallError::SchemaValidation {
            tool: tool.to_string(),
            message: message.into(),
        }
    }

    pub fn execution(tool: &str, message: impl Into<String>) -> Self {
        ToolcallError::ToolExecution {
            tool: tool.to_string(),
            message: message.into(),
        }
    }

    pub fn model(message: impl Into<String>) -> Self {
        ToolcallError::ModelRequest {
            status: None,
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for ToolcallError {
    fn from(err: anyhow::Error) -> Self {
        ToolcallError::Configuration(format!("{:#}", err))
    }
}

pub type Result<T> = std::result::Result<T, ToolcallError>;
