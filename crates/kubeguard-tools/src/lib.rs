//! Tool implementations for Kubeguard

pub mod kubectl;

pub use kubectl::KubectlTool;

use kubeguard_core::tools::{ToolError, ToolRegistry, ToolRegistryBuilder};
use std::sync::Arc;

/// Registry holding every tool this crate provides
pub fn default_registry() -> Result<ToolRegistry, ToolError> {
    ToolRegistryBuilder::new()
        .with_tool(Arc::new(KubectlTool::new()))
        .build()
}
