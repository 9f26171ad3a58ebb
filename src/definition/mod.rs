//! Framework-neutral tool definitions.
//!
//! A [`ToolDefinition`] is written once and projected into framework
//! schemas through the adapters registered on it.

pub mod parameter;
pub mod tool;

pub use parameter::ToolParameter;
pub use tool::{FnHandler, ToolConfig, ToolDefinition, ToolHandler, handler_fn};
