use crate::api::RequestBody;
use crate::config::Config;
use crate::error::{Result, ToolcallError};
use crate::models::Message;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct ChatClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: Option<f32>,
}

impl ChatClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(|e| {
                ToolcallError::Configuration(format!("Invalid authorization header: {}", e))
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ToolcallError::model(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: config.api_endpoint.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    /// Send one chat-completion request and return the decoded JSON body.
    pub async fn complete(&self, messages: &[Message], tools: Option<Vec<Value>>) -> Result<Value> {
        let request_body = RequestBody {
            model: self.model.clone(),
            messages: messages.to_vec(),
            temperature: self.temperature,
            tools,
        };

        tracing::debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            messages = request_body.messages.len(),
            tools = request_body.tools.as_ref().map_or(0, |t| t.len()),
            "sending chat completion request"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| ToolcallError::model(e.to_string()))?;

        let status = response.status();
        tracing::debug!(status = %status, "chat completion response received");

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ToolcallError::ModelRequest {
                status: Some(status.as_u16()),
                message: error_text,
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| ToolcallError::model(format!("Failed to read response body: {}", e)))?;
        tracing::trace!(body = %response_text, "raw chat completion response");

        serde_json::from_str(&response_text)
            .map_err(|e| ToolcallError::model(format!("Invalid JSON in response: {}", e)))
    }
}
