pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod tools;
pub mod ui;

pub use error::{Result, ToolcallError};
pub use orchestrator::{DispatchOutcome, Dispatcher, ToolOutcome};
pub use tools::{Tool, ToolRegistry};
