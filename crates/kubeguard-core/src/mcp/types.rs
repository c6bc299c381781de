//! MCP payload types

use crate::mcp::protocol::RequestId;
use crate::tools::ToolSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server information returned from `initialize`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpServerInfo {
    pub name: String,
    pub version: String,
}

/// Server capabilities
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpCapabilities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolCapabilities>,
}

/// Tool capabilities
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCapabilities {
    #[serde(default)]
    pub list_changed: bool,
}

/// Result of `initialize`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: McpCapabilities,
    pub server_info: McpServerInfo,
}

/// Tool definition as listed by `tools/list`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpTool {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub input_schema: Value,
}

impl From<ToolSchema> for McpTool {
    fn from(schema: ToolSchema) -> Self {
        Self {
            name: schema.name,
            description: Some(schema.description),
            input_schema: schema.parameters,
        }
    }
}

/// Parameters of `tools/call`
///
/// `arguments` is kept raw; the server checks its shape itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Parameters of `notifications/cancelled`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelledParams {
    pub request_id: RequestId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Result of `tools/call`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpToolResult {
    pub content: Vec<McpContent>,
    #[serde(default)]
    pub is_error: bool,
}

impl McpToolResult {
    /// Successful result with a single text item
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![McpContent::text(text)],
            is_error: false,
        }
    }

    /// Tool-level error with a single text item
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![McpContent::text(text)],
            is_error: true,
        }
    }

    /// Concatenated text of all text items
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .map(|content| match content {
                McpContent::Text { text } => text.as_str(),
            })
            .collect()
    }
}

/// Content item in a tool result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum McpContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl McpContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolParameter;
    use serde_json::json;

    #[test]
    fn test_tool_result_wire_format() {
        let result = McpToolResult::error("Missing required parameter: command");
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "content": [{"type": "text", "text": "Missing required parameter: command"}],
                "isError": true
            })
        );
    }

    #[test]
    fn test_tool_from_schema() {
        let schema = ToolSchema::new(
            "kubectl",
            "Run kubectl",
            vec![ToolParameter::string("command", "Command to run")],
        );
        let value = serde_json::to_value(McpTool::from(schema)).unwrap();
        assert_eq!(value["name"], "kubectl");
        assert_eq!(value["inputSchema"]["required"], json!(["command"]));
    }

    #[test]
    fn test_call_params_missing_arguments() {
        let params: CallToolParams = serde_json::from_value(json!({"name": "kubectl"})).unwrap();
        assert!(params.arguments.is_null());
    }

    #[test]
    fn test_cancelled_params() {
        let params: CancelledParams =
            serde_json::from_value(json!({"requestId": 9, "reason": "user aborted"})).unwrap();
        assert_eq!(params.request_id, RequestId::Number(9));
    }

    #[test]
    fn test_initialize_result_casing() {
        let result = InitializeResult {
            protocol_version: "2024-11-05".into(),
            capabilities: McpCapabilities {
                tools: Some(ToolCapabilities { list_changed: true }),
            },
            server_info: McpServerInfo {
                name: "kubeguard".into(),
                version: "0.3.2".into(),
            },
        };
        let value = serde_json::to_value(result).unwrap();
        assert_eq!(value["protocolVersion"], "2024-11-05");
        assert_eq!(value["capabilities"]["tools"]["listChanged"], true);
        assert_eq!(value["serverInfo"]["name"], "kubeguard");
    }
}
