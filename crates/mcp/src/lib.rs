pub mod config;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

pub use config::{Cli, ServerConfig, Transport};
pub use server::McpServer;
pub use tools::{ToolDefinition, ToolId, ToolInvocationResult, ToolRegistry};
