//! Define an AI tool once and hand it to any framework.
//!
//! A [`ToolDefinition`] carries a name, a description, ordered parameters
//! and a handler. Adapters registered on it project it into the schema a
//! framework expects (OpenAI function calling, OpenAI agents, MCP). The
//! bundled server publishes a catalog of tools over MCP on stdio or
//! HTTP + server-sent events.
//!
//! # Example
//!
//! ```no_run
//! use nebula_tools::{
//!     adapters::OpenAiAdapter,
//!     config::{HttpConfig, ServerConfig, TransportMode},
//!     definition::{ToolConfig, ToolDefinition, ToolParameter, handler_fn},
//!     protocol::McpServerBuilder,
//!     server::{McpHandler, ServerStateBuilder},
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut weather = ToolDefinition::new(ToolConfig {
//!         name: "get_weather".into(),
//!         description: "Current weather for a city".into(),
//!         parameters: vec![ToolParameter::new("city", "string", "City name")],
//!         handler: handler_fn(|args| async move { Ok(json!({ "city": args["city"], "temp": 21 })) }),
//!     });
//!     weather.register_adapter(Arc::new(OpenAiAdapter));
//!     println!("{}", weather.for_framework("openai")?);
//!
//!     let state = ServerStateBuilder::new().config(ServerConfig::default()).build()?;
//!     state.tools.register(weather)?;
//!
//!     let config = ServerConfig::builder()
//!         .transport(TransportMode::Sse)
//!         .http(HttpConfig::builder().from_env()?.build()?)
//!         .build();
//!
//!     let server = McpServerBuilder::new()
//!         .handler(McpHandler::new(Arc::new(state)))
//!         .with_tools()
//!         .build()?;
//!     server.run(&config).await?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod config;
pub mod definition;
pub mod error;
pub mod protocol;
pub mod server;
pub mod tools;

pub use adapters::{
    AdapterRegistry, FrameworkAdapter, McpAdapter, OpenAiAdapter, OpenAiAgentsAdapter,
    standard_adapters,
};
pub use config::{HttpConfig, ServerConfig, TransportMode};
pub use definition::{ToolConfig, ToolDefinition, ToolHandler, ToolParameter, handler_fn};
pub use error::{AdapterError, McpError, Result};
pub use protocol::{McpServer, McpServerBuilder};
pub use server::{McpHandler, ServerState, ServerStateBuilder};
pub use tools::ToolCatalog;
