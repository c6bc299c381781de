//! Tools command implementation

use kubeguard_core::mcp::McpTool;

/// Tool definitions exactly as `tools/list` reports them
pub fn tool_definitions() -> anyhow::Result<Vec<McpTool>> {
    let registry = kubeguard_tools::default_registry()?;
    Ok(registry
        .all_tools()
        .iter()
        .map(|tool| McpTool::from(tool.schema()))
        .collect())
}

/// Print the registered tool schemas as JSON
pub fn show_tools() -> anyhow::Result<()> {
    let tools = tool_definitions()?;
    println!("{}", serde_json::to_string_pretty(&tools)?);
    Ok(())
}
