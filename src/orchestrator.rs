use crate::api::response::{extract_content, parse_tool_calls};
use crate::api::ChatClient;
use crate::config::Config;
use crate::error::{Result, ToolcallError};
use crate::models::{Message, ToolCall};
use crate::tools::{ToolRegistry, ToolSettings};
use uuid::Uuid;

/// Result of a single tool call, in the order the model requested it.
#[derive(Debug)]
pub struct ToolOutcome {
    pub call_id: String,
    pub name: String,
    pub result: Result<String>,
}

impl ToolOutcome {
    /// Text sent back to the model as the `tool` message content.
    pub fn message_text(&self) -> String {
        match &self.result {
            Ok(text) => text.clone(),
            Err(e) => format!("Error: {}", e),
        }
    }
}

#[derive(Debug, Default)]
pub struct DispatchOutcome {
    pub tool_outcomes: Vec<ToolOutcome>,
    /// Text content of the last model response.
    pub content: Option<String>,
    /// Number of chat-completion requests made.
    pub rounds: usize,
}

impl DispatchOutcome {
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_outcomes.is_empty()
    }
}

pub struct Dispatcher {
    client: ChatClient,
    registry: ToolRegistry,
    system_prompt: Option<String>,
    follow_up: bool,
    max_rounds: usize,
}

impl Dispatcher {
    /// One-shot dispatcher: tool results are not sent back to the model.
    pub fn new(client: ChatClient, registry: ToolRegistry) -> Self {
        Self {
            client,
            registry,
            system_prompt: None,
            follow_up: false,
            max_rounds: 1,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = ChatClient::new(config)?;
        let registry = ToolRegistry::with_builtin_tools(&ToolSettings::from_config(config))?;

        let mut dispatcher = Self::new(client, registry);
        dispatcher.system_prompt = config.system_prompt.clone();
        if config.follow_up {
            dispatcher = dispatcher.with_follow_up(config.max_rounds);
        }
        Ok(dispatcher)
    }

    /// Feed tool results back to the model until it stops calling tools or
    /// `max_rounds` requests have been made.
    pub fn with_follow_up(mut self, max_rounds: usize) -> Self {
        self.follow_up = true;
        self.max_rounds = max_rounds.max(1);
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Send `prompt` with the registered tool schemas and run every tool call
    /// the model returns.
    ///
    /// Only a failed model request aborts the run; tool failures are reported
    /// per call in the outcome.
    pub async fn run(&self, prompt: &str) -> Result<DispatchOutcome> {
        let mut messages = Vec::new();
        if let Some(system_prompt) = &self.system_prompt {
            messages.push(Message::system(system_prompt.clone()));
        }
        messages.push(Message::user(prompt));

        let tools = self.registry.format_tools_for_llm();
        let tools = if tools.is_empty() { None } else { Some(tools) };

        let mut outcome = DispatchOutcome::default();

        loop {
            outcome.rounds += 1;
            tracing::debug!(round = outcome.rounds, "requesting model response");

            let response = self.client.complete(&messages, tools.clone()).await?;
            let tool_calls = normalize_tool_calls(parse_tool_calls(&response)?);
            let content = extract_content(&response)?;

            if tool_calls.is_empty() {
                tracing::debug!("no tool calls in response; using assistant content");
                outcome.content = content;
                return Ok(outcome);
            }

            let results = self.execute_tool_calls(&tool_calls).await;

            if !self.follow_up || outcome.rounds >= self.max_rounds {
                if self.follow_up {
                    tracing::warn!(
                        max_rounds = self.max_rounds,
                        "stopping with pending tool calls: round limit reached"
                    );
                }
                outcome.content = content;
                outcome.tool_outcomes.extend(results);
                return Ok(outcome);
            }

            messages.push(Message::assistant(content, tool_calls));
            for result in &results {
                messages.push(Message::tool(result.call_id.clone(), result.message_text()));
            }
            outcome.tool_outcomes.extend(results);
        }
    }

    /// Execute tool calls sequentially. A failing call does not stop the
    /// calls after it.
    pub async fn execute_tool_calls(&self, tool_calls: &[ToolCall]) -> Vec<ToolOutcome> {
        let mut outcomes = Vec::with_capacity(tool_calls.len());

        for tool_call in tool_calls {
            let name = tool_call.function.name.clone();
            let call_id = tool_call
                .id
                .clone()
                .unwrap_or_else(generate_call_id);

            tracing::debug!(
                tool = %name,
                args = %tool_call.function.arguments_preview(),
                "selected tool"
            );

            let result = match (&tool_call.malformed, tool_call.function.parsed_arguments()) {
                (Some(_), _) if !self.registry.contains(&name) => {
                    Err(ToolcallError::UnknownTool(name.clone()))
                }
                (Some(reason), _) => Err(ToolcallError::schema(&name, reason.clone())),
                (None, Ok(arguments)) => self.registry.call_tool(&name, &arguments).await,
                (None, Err(e)) if self.registry.contains(&name) => Err(ToolcallError::schema(
                    &name,
                    format!("arguments are not valid JSON: {}", e),
                )),
                (None, Err(_)) => Err(ToolcallError::UnknownTool(name.clone())),
            };

            if let Err(e) = &result {
                tracing::debug!(tool = %name, error = %e, "tool call failed");
            }

            outcomes.push(ToolOutcome {
                call_id,
                name,
                result,
            });
        }

        outcomes
    }
}

fn generate_call_id() -> String {
    format!("call_{}", Uuid::new_v4().simple())
}

/// Give every call an id so tool messages can reference it, and keep the
/// arguments string-encoded for when the call is sent back to the model.
fn normalize_tool_calls(tool_calls: Vec<ToolCall>) -> Vec<ToolCall> {
    tool_calls
        .into_iter()
        .map(|mut call| {
            if call.id.as_deref().map_or(true, str::is_empty) {
                call.id = Some(generate_call_id());
            }
            call.function.encode_arguments();
            call
        })
        .collect()
}
