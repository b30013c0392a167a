use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{decode_arguments, Tool};
use crate::error::Result;

pub const NAME: &str = "multiply";

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MultiplyArgs {
    pub a: f64,
    pub b: f64,
}

pub fn multiply(args: &MultiplyArgs) -> String {
    format!("The value of {} x {} is: {}", args.a, args.b, args.a * args.b)
}

pub struct MultiplyTool;

#[async_trait]
impl Tool for MultiplyTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Multiply two numbers"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "a": { "type": "number", "description": "First factor" },
                "b": { "type": "number", "description": "Second factor" }
            },
            "required": ["a", "b"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<String> {
        let args: MultiplyArgs = decode_arguments(NAME, arguments)?;
        Ok(multiply(&args))
    }
}
