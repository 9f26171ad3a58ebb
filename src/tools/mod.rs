//! Tools served over MCP.

pub mod builtin;
pub mod catalog;

pub use builtin::{DESCRIBE_TOOL, LIST_FRAMEWORKS, create_catalog, describe_tool, list_frameworks};
pub use catalog::ToolCatalog;
