//! Core library for Kubeguard
//!
//! Provides the pieces shared by every Kubeguard binary and tool:
//!
//! - [`tools`]: the `Tool` trait, call/schema/result types, the typed
//!   execution context and an explicit tool registry
//! - [`config`]: configuration model, file loading and kubeconfig path resolution
//! - [`mcp`]: Model Context Protocol message types, stdio transport and server

pub mod config;
pub mod error;
pub mod mcp;
pub mod tools;

pub use config::{Config, KubeconfigError, PathResolver};
pub use error::{KubeguardError, KubeguardResult};
pub use mcp::{McpServer, McpServerOptions};
pub use tools::{
    ContextError, ExecResult, ExecutionContext, ModifiesResource, Tool, ToolCall, ToolError,
    ToolParameter, ToolRegistry, ToolSchema,
};
