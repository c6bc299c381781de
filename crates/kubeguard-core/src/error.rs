//! Error types for Kubeguard

use thiserror::Error;

/// Result type alias for Kubeguard operations
pub type KubeguardResult<T> = Result<T, KubeguardError>;

/// Main error type for Kubeguard
#[derive(Error, Debug, Clone)]
pub enum KubeguardError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// Tool framework errors
    #[error("Tool error: {tool_name}: {message}")]
    Tool { tool_name: String, message: String },

    /// Kubeconfig path resolution errors
    #[error("Kubeconfig error: {0}")]
    Kubeconfig(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Protocol errors
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl KubeguardError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with a description of what was being done
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new tool error
    pub fn tool(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Tool {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }

    /// Context attached to the error, if any
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::Config { context, .. } => context.as_deref(),
            _ => None,
        }
    }
}

impl From<std::io::Error> for KubeguardError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for KubeguardError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}

impl From<crate::config::KubeconfigError> for KubeguardError {
    fn from(error: crate::config::KubeconfigError) -> Self {
        Self::Kubeconfig(error.to_string())
    }
}

impl From<crate::tools::ToolError> for KubeguardError {
    fn from(error: crate::tools::ToolError) -> Self {
        match error {
            crate::tools::ToolError::AlreadyRegistered(name) => {
                Self::tool(name, "Tool already registered")
            }
            crate::tools::ToolError::Interactive(message) => Self::tool("kubectl", message),
        }
    }
}

impl From<crate::mcp::McpError> for KubeguardError {
    fn from(error: crate::mcp::McpError) -> Self {
        Self::Protocol(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_keeps_context() {
        let err = KubeguardError::config_with_context("bad value", "Reading '/tmp/x.json'");
        assert_eq!(err.to_string(), "Configuration error: bad value");
        assert_eq!(err.context(), Some("Reading '/tmp/x.json'"));
    }

    #[test]
    fn test_tool_error_conversion() {
        let err: KubeguardError = crate::tools::ToolError::AlreadyRegistered("kubectl".into()).into();
        assert_eq!(err.to_string(), "Tool error: kubectl: Tool already registered");

        let err: KubeguardError =
            crate::tools::ToolError::Interactive("needs a terminal".into()).into();
        assert_eq!(err.to_string(), "Tool error: kubectl: needs a terminal");
    }
}
