//! Tool framework: trait, call/result types, execution context and registry

pub mod base;
pub mod context;
pub mod registry;
pub mod types;

pub use base::{Tool, ToolError};
pub use context::{ContextError, ExecutionContext};
pub use registry::{ToolRegistry, ToolRegistryBuilder};
pub use types::{ExecResult, ModifiesResource, ToolCall, ToolParameter, ToolSchema};
