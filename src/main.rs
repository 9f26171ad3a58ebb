//! MCP server binary entry point.
//!
//! `nebula-tools` serves on stdio; `nebula-tools sse` serves HTTP + SSE on
//! `HOSTNAME:PORT`.

use anyhow::Result;
use nebula_tools::{
    config::{ServerConfig, TransportMode},
    protocol::McpServerBuilder,
    server::{McpHandler, ServerStateBuilder},
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!(
        "Starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let transport = TransportMode::from_args(std::env::args());
    let config = ServerConfig::from_env(transport)?;

    let state = Arc::new(ServerStateBuilder::new().config(config.clone()).build()?);
    info!("Server state initialized with {} tools", state.tools.len());

    let handler = McpHandler::new(state);
    let server = McpServerBuilder::new()
        .handler(handler)
        .name(config.name.clone())
        .version(config.version.clone())
        .with_tools()
        .build()?;

    info!("MCP server ready, waiting for connections...");

    server.run(&config).await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("nebula_tools=info,warn"));

    // JSON to stderr; stdout carries the stdio transport.
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .json()
        .init();
}
