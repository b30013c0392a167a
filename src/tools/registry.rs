use jsonschema::{Draft, JSONSchema};
use serde_json::{json, Value};
use std::collections::HashMap;

use super::{MultiplyTool, Tool, WeatherTool};
use crate::config::Config;
use crate::error::{Result, ToolcallError};

#[derive(Debug, Clone)]
pub struct ToolSettings {
    pub weather_base_url: String,
    pub timeout_secs: u64,
}

impl ToolSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            weather_base_url: config.weather_base_url.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

struct RegisteredTool {
    tool: Box<dyn Tool>,
    validator: JSONSchema,
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `multiply` and `getWeatherFromCoords`.
    pub fn with_builtin_tools(settings: &ToolSettings) -> Result<Self> {
        let mut registry = Self::new();
        registry.register(MultiplyTool)?;
        registry.register(WeatherTool::new(
            settings.weather_base_url.clone(),
            settings.timeout_secs,
        )?)?;
        Ok(registry)
    }

    pub fn register(&mut self, tool: impl Tool + 'static) -> Result<()> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(ToolcallError::Configuration(format!(
                "Tool '{}' is already registered",
                name
            )));
        }

        let schema = tool.input_schema();
        let validator = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema)
            .map_err(|e| {
                ToolcallError::Configuration(format!("Invalid schema for tool '{}': {}", name, e))
            })?;

        self.tools.insert(
            name,
            RegisteredTool {
                tool: Box::new(tool),
                validator,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|entry| entry.tool.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered tools, sorted by name.
    pub fn list(&self) -> Vec<&dyn Tool> {
        let mut tools: Vec<&dyn Tool> = self.tools.values().map(|e| e.tool.as_ref()).collect();
        tools.sort_by(|a, b| a.name().cmp(b.name()));
        tools
    }

    pub fn names(&self) -> Vec<String> {
        self.list().iter().map(|t| t.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Function declarations in the OpenAI `tools` format.
    pub fn format_tools_for_llm(&self) -> Vec<Value> {
        self.list()
            .iter()
            .map(|tool| {
                json!({
                    "type": "function",
                    "function": {
                        "name": tool.name(),
                        "description": tool.description(),
                        "parameters": tool.input_schema(),
                    }
                })
            })
            .collect()
    }

    pub fn validate_arguments(&self, tool_name: &str, arguments: &Value) -> Result<()> {
        let entry = self
            .tools
            .get(tool_name)
            .ok_or_else(|| ToolcallError::UnknownTool(tool_name.to_string()))?;

        if let Err(errors) = entry.validator.validate(arguments) {
            let error_messages: Vec<String> = errors
                .map(|e| {
                    let path = e.instance_path.to_string();
                    if path.is_empty() {
                        e.to_string()
                    } else {
                        format!("{}: {}", path, e)
                    }
                })
                .collect();
            return Err(ToolcallError::schema(tool_name, error_messages.join("; ")));
        }

        Ok(())
    }

    /// Look up, validate and run a tool. The handler is only reached with
    /// arguments that passed schema validation.
    pub async fn call_tool(&self, tool_name: &str, arguments: &Value) -> Result<String> {
        let entry = self
            .tools
            .get(tool_name)
            .ok_or_else(|| ToolcallError::UnknownTool(tool_name.to_string()))?;

        self.validate_arguments(tool_name, arguments)?;

        tracing::debug!(tool = tool_name, "executing tool");
        entry.tool.execute(arguments.clone()).await
    }
}
