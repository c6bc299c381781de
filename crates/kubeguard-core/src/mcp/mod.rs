//! Model Context Protocol server
//!
//! JSON-RPC 2.0 over newline-delimited stdio. Supports `initialize`, `ping`,
//! `tools/list`, `tools/call` and the `initialized`/`cancelled` notifications.

pub mod error;
pub mod protocol;
pub mod server;
pub mod transport;
pub mod types;

pub use error::McpError;
pub use protocol::{
    MCP_PROTOCOL_VERSION, McpMessage, McpNotification, McpRequest, McpResponse, McpRpcError,
    RequestId,
};
pub use server::{ALLOWED_TOOL, McpServer, McpServerOptions};
pub use transport::{InboundLine, MessageReader, MessageWriter};
pub use types::{CallToolParams, McpContent, McpTool, McpToolResult};
