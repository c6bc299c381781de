//! Configuration data model

use crate::config::kubeconfig::PathResolver;
use crate::error::{KubeguardError, KubeguardResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server name reported during MCP initialization
    pub name: String,
    pub description: String,
    /// Server version reported during MCP initialization
    pub version: String,
    /// Enables debug logging
    pub debug: bool,
    pub kubeconfig: KubeconfigSettings,
    pub mcp: McpSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "kubeguard".to_string(),
            description: "Guarded kubectl execution over MCP".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            debug: false,
            kubeconfig: KubeconfigSettings::default(),
            mcp: McpSettings::default(),
        }
    }
}

/// Kubeconfig settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KubeconfigSettings {
    /// Path to the kubeconfig; empty means kubectl's own default
    pub path: String,
}

/// MCP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct McpSettings {
    /// Upper bound on concurrently executing tool calls
    #[serde(alias = "maxConcurrentOps")]
    pub max_concurrent_ops: usize,
    /// Per-call timeout in seconds; 0 disables it
    #[serde(alias = "operationTimeout")]
    pub operation_timeout: u64,
}

impl Default for McpSettings {
    fn default() -> Self {
        Self {
            max_concurrent_ops: 5,
            operation_timeout: 30,
        }
    }
}

impl McpSettings {
    /// Per-call timeout, `None` when disabled
    pub fn timeout(&self) -> Option<Duration> {
        (self.operation_timeout > 0).then(|| Duration::from_secs(self.operation_timeout))
    }
}

impl Config {
    /// Resolved kubeconfig path
    ///
    /// Empty when no path is configured. When resolution fails the configured
    /// string is returned as is.
    pub fn kubeconfig_path(&self) -> String {
        let configured = &self.kubeconfig.path;
        if configured.is_empty() {
            return String::new();
        }

        match PathResolver::system().resolve(configured) {
            Ok(path) => path.to_string_lossy().into_owned(),
            Err(e) => {
                tracing::warn!(path = %configured, error = %e, "failed to resolve kubeconfig path");
                configured.clone()
            }
        }
    }

    /// Write the configuration as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> KubeguardResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    KubeguardError::config_with_context(
                        format!("Failed to create config directory: {}", e),
                        format!("Creating '{}'", parent.display()),
                    )
                })?;
            }
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| {
            KubeguardError::config_with_context(
                format!("Failed to write config file: {}", e),
                format!("Saving configuration to '{}'", path.display()),
            )
        })?;
        Ok(())
    }
}
