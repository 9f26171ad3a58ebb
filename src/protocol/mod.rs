//! MCP protocol implementation over JSON-RPC 2.0.

pub mod handler;
pub mod server;
pub mod sse;
pub mod transport;
pub mod types;

pub use handler::{Dispatcher, Handler};
pub use server::{Lifecycle, McpServer, McpServerBuilder, shutdown_signal};
pub use sse::SseServer;
pub use transport::{LineTransport, StdioTransport, Transport};
pub use types::*;
