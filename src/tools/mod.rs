mod multiply;
mod registry;
mod weather;

pub use multiply::{multiply, MultiplyArgs, MultiplyTool};
pub use registry::{ToolRegistry, ToolSettings};
pub use weather::{format_weather, CurrentWeather, WeatherArgs, WeatherTool};

use crate::error::{Result, ToolcallError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A callable capability the model can request by name.
///
/// The registry validates arguments against `input_schema` before `execute`
/// is ever called.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn input_schema(&self) -> Value;

    async fn execute(&self, arguments: Value) -> Result<String>;
}

/// Decode schema-checked arguments into the tool's typed argument struct.
pub fn decode_arguments<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T> {
    serde_json::from_value(arguments).map_err(|e| ToolcallError::schema(tool, e.to_string()))
}
