//! MCP server with lifecycle management.

use crate::config::{ServerConfig, TransportMode};
use crate::error::{McpError, ProtocolError, Result};
use crate::protocol::handler::{Dispatcher, Handler};
use crate::protocol::sse::SseServer;
use crate::protocol::transport::{StdioTransport, Transport};
use crate::protocol::types::*;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

/// Server lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Server created but not initialized.
    Created,
    /// Initialize request received, awaiting initialized notification.
    Initializing,
    /// Server is fully operational.
    Running,
    /// Shutdown requested.
    ShuttingDown,
    /// Server has stopped.
    Stopped,
}

/// MCP Server.
pub struct McpServer<H: Handler> {
    info: Implementation,
    capabilities: ServerCapabilities,
    handler: Arc<H>,
    lifecycle: Arc<RwLock<Lifecycle>>,
    running: AtomicBool,
}

impl<H: Handler + 'static> McpServer<H> {
    pub fn new(handler: H, info: Implementation, capabilities: ServerCapabilities) -> Self {
        Self {
            info,
            capabilities,
            handler: Arc::new(handler),
            lifecycle: Arc::new(RwLock::new(Lifecycle::Created)),
            running: AtomicBool::new(false),
        }
    }

    pub fn info(&self) -> &Implementation {
        &self.info
    }

    pub fn capabilities(&self) -> &ServerCapabilities {
        &self.capabilities
    }

    pub async fn lifecycle(&self) -> Lifecycle {
        *self.lifecycle.read().await
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Serve on the transport selected by `config` until EOF, a shutdown
    /// request or Ctrl-C.
    #[instrument(skip(self, config), fields(server = %self.info.name, transport = ?config.transport))]
    pub async fn run(self, config: &ServerConfig) -> Result<()> {
        match config.transport {
            TransportMode::Stdio => {
                let transport = Arc::new(StdioTransport::stdio());
                self.run_until(transport, shutdown_signal()).await
            }
            TransportMode::Sse => {
                info!(
                    "Starting MCP server: {} v{} (sse)",
                    self.info.name, self.info.version
                );
                let addr = config.http.bind_address();
                SseServer::new(self.handler)
                    .serve(&addr, shutdown_signal())
                    .await
            }
        }
    }

    /// Run the server with a custom transport until end of input.
    pub async fn run_with_transport<T: Transport + 'static>(self, transport: Arc<T>) -> Result<()> {
        self.run_until(transport, std::future::pending()).await
    }

    /// Run the message loop until end of input, a `shutdown` request or
    /// `shutdown` resolving.
    pub async fn run_until<T, F>(self, transport: Arc<T>, shutdown: F) -> Result<()>
    where
        T: Transport + 'static,
        F: Future<Output = ()> + Send,
    {
        info!(
            "Starting MCP server: {} v{}",
            self.info.name, self.info.version
        );
        self.running.store(true, Ordering::SeqCst);

        let dispatcher = Dispatcher::new(Arc::clone(&self.handler));
        tokio::pin!(shutdown);

        loop {
            if !self.running.load(Ordering::SeqCst) {
                info!("Server stopping...");
                break;
            }

            let next = tokio::select! {
                _ = &mut shutdown => {
                    info!("Interrupt received, shutting down");
                    break;
                }
                next = transport.read_message() => next,
            };

            let message = match next {
                Ok(Some(msg)) => msg,
                Ok(None) => {
                    debug!("EOF received, shutting down");
                    break;
                }
                Err(McpError::Protocol(ProtocolError::ParseError)) => {
                    let response = JsonRpcResponse::error(None, JsonRpcError::parse_error());
                    if let Err(e) = transport.write_response(&response).await {
                        error!("Failed to send error response: {}", e);
                    }
                    continue;
                }
                Err(e) => {
                    error!("Transport error: {}", e);
                    break;
                }
            };

            match message {
                Message::Request(request) => {
                    let is_notification = request.is_notification();
                    let method = request.method.clone();

                    self.advance_lifecycle(&method).await;

                    let response = dispatcher.dispatch(request).await;

                    if !is_notification && let Err(e) = transport.write_response(&response).await {
                        error!("Failed to send response: {}", e);
                    }

                    if method == "shutdown" {
                        info!("Shutdown request received");
                        self.stop();
                    }
                }
                Message::Response(response) => {
                    warn!("Unexpected response received: {:?}", response.id);
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        *self.lifecycle.write().await = Lifecycle::Stopped;
        info!("Server stopped");
        Ok(())
    }

    async fn advance_lifecycle(&self, method: &str) {
        let mut lifecycle = self.lifecycle.write().await;
        match method {
            "initialize" if *lifecycle == Lifecycle::Created => {
                *lifecycle = Lifecycle::Initializing;
            }
            "initialized" | "notifications/initialized"
                if *lifecycle == Lifecycle::Initializing =>
            {
                *lifecycle = Lifecycle::Running;
                info!("Server initialized and running");
            }
            "shutdown" => {
                *lifecycle = Lifecycle::ShuttingDown;
            }
            _ => {}
        }
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

/// Resolves on Ctrl-C. Never resolves if the signal handler cannot be installed.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Builder for MCP Server.
pub struct McpServerBuilder<H: Handler> {
    handler: Option<H>,
    name: String,
    version: String,
    capabilities: ServerCapabilities,
}

impl<H: Handler + 'static> McpServerBuilder<H> {
    pub fn new() -> Self {
        Self {
            handler: None,
            name: env!("CARGO_PKG_NAME").into(),
            version: env!("CARGO_PKG_VERSION").into(),
            capabilities: ServerCapabilities::default(),
        }
    }

    pub fn handler(mut self, handler: H) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_tools(mut self) -> Self {
        self.capabilities.tools = Some(ToolsCapability {
            list_changed: Some(false),
        });
        self
    }

    pub fn build(self) -> Result<McpServer<H>> {
        let handler = self.handler.ok_or_else(|| McpError::Internal {
            message: "Handler is required".into(),
        })?;

        Ok(McpServer::new(
            handler,
            Implementation {
                name: self.name,
                version: self.version,
            },
            self.capabilities,
        ))
    }
}

impl<H: Handler + 'static> Default for McpServerBuilder<H> {
    fn default() -> Self {
        Self::new()
    }
}
