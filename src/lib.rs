//! Kubeguard
//!
//! An MCP server exposing one guarded `kubectl` tool to language-model
//! agents. This crate re-exports the workspace crates:
//!
//! - [`core`]: tool framework, configuration and the MCP server
//! - [`tools`]: the kubectl tool and its validation gate

pub use kubeguard_core as core;
pub use kubeguard_tools as tools;

pub use kubeguard_core::{
    Config, ExecResult, ExecutionContext, KubeguardError, KubeguardResult, McpServer,
    McpServerOptions, ModifiesResource, Tool, ToolCall, ToolRegistry,
};
pub use kubeguard_tools::{KubectlTool, default_registry};
