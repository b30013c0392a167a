mod message;
mod tool;

pub use message::Message;
pub use tool::{FunctionCall, ToolCall};
