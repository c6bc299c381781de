//! Base trait and error type for tools

use crate::tools::context::ExecutionContext;
use crate::tools::types::{ExecResult, ModifiesResource, ToolCall, ToolSchema};
use async_trait::async_trait;

/// Error type for tool operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    /// The call requires an interactive terminal
    #[error("{0}")]
    Interactive(String),

    /// A tool with the same name is already registered
    #[error("Tool already registered: {0}")]
    AlreadyRegistered(String),
}

/// Base trait for all tools
///
/// A tool is the unit of capability the protocol layer exposes to a model.
/// `run` never fails: every rejection and every failing child process is
/// reported inside the returned [`ExecResult`].
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name, as registered with the protocol layer
    fn name(&self) -> &str;

    /// Description shown to the model
    fn description(&self) -> &str;

    /// JSON schema for the input parameters
    fn schema(&self) -> ToolSchema;

    /// Run the tool for one call
    async fn run(&self, ctx: &ExecutionContext, call: &ToolCall) -> ExecResult;

    /// Reject calls that would need a TTY
    ///
    /// Calls that cannot be inspected (missing or non-string arguments) are
    /// not considered interactive.
    fn is_interactive(&self, call: &ToolCall) -> Result<(), ToolError> {
        let _ = call;
        Ok(())
    }

    /// Best-effort side-effect label for the call; advisory only
    fn check_modifies_resource(&self, call: &ToolCall) -> ModifiesResource {
        let _ = call;
        ModifiesResource::Unknown
    }
}
