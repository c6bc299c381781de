//! MCP error types

use thiserror::Error;

/// Errors raised by the MCP server loop
#[derive(Debug, Error, Clone)]
pub enum McpError {
    /// Reading from or writing to the transport failed
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        context: Option<String>,
    },

    /// A message could not be encoded
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        context: Option<String>,
    },

    /// A background task ended abnormally
    #[error("Task error: {message}")]
    Task {
        message: String,
        context: Option<String>,
    },
}

impl McpError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            context: None,
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
            context: None,
        }
    }

    pub fn task(message: impl Into<String>) -> Self {
        Self::Task {
            message: message.into(),
            context: None,
        }
    }

    /// Attach a description of what was being done
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let ctx = Some(context.into());
        match &mut self {
            Self::Transport { context: c, .. }
            | Self::Serialization { context: c, .. }
            | Self::Task { context: c, .. } => *c = ctx,
        }
        self
    }

    pub fn context(&self) -> Option<&str> {
        match self {
            Self::Transport { context, .. }
            | Self::Serialization { context, .. }
            | Self::Task { context, .. } => context.as_deref(),
        }
    }
}

impl From<std::io::Error> for McpError {
    fn from(err: std::io::Error) -> Self {
        Self::transport(err.to_string())
    }
}

impl From<serde_json::Error> for McpError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<tokio::task::JoinError> for McpError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::task(err.to_string())
    }
}
