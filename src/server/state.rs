//! Server state management.

use crate::config::ServerConfig;
use crate::error::Result;
use crate::protocol::Implementation;
use crate::tools::{ToolCatalog, create_catalog};
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

pub struct ServerState {
    pub config: ServerConfig,
    pub tools: Arc<ToolCatalog>,
    initialized: AtomicBool,
    client_info: RwLock<Option<Implementation>>,
    request_count: AtomicU64,
}

impl ServerState {
    pub fn new(config: ServerConfig, tools: Arc<ToolCatalog>) -> Self {
        Self {
            config,
            tools,
            initialized: AtomicBool::new(false),
            client_info: RwLock::new(None),
            request_count: AtomicU64::new(0),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    pub fn set_initialized(&self, client_info: Implementation) {
        *self.client_info.write() = Some(client_info);
        self.initialized.store(true, Ordering::SeqCst);
    }

    pub fn client_info(&self) -> Option<Implementation> {
        self.client_info.read().clone()
    }

    pub fn next_request_id(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct ServerStateBuilder {
    config: Option<ServerConfig>,
    tools: Option<Arc<ToolCatalog>>,
}

impl ServerStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Serve `tools` instead of the built-in catalog.
    pub fn tools(mut self, tools: Arc<ToolCatalog>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn build(self) -> Result<ServerState> {
        let tools = match self.tools {
            Some(tools) => tools,
            None => create_catalog()?,
        };

        Ok(ServerState::new(self.config.unwrap_or_default(), tools))
    }
}
