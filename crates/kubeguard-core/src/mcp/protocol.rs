//! JSON-RPC 2.0 message types for the Model Context Protocol

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol version this server speaks
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC version
pub const JSONRPC_VERSION: &str = "2.0";

/// Any message that can arrive on the wire
///
/// Variant order matters for untagged decoding: a request carries both `id`
/// and `method`, a notification only `method`, a response only `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum McpMessage {
    Request(McpRequest),
    Notification(McpNotification),
    Response(McpResponse),
}

impl McpMessage {
    pub fn is_request(&self) -> bool {
        matches!(self, Self::Request(_))
    }

    pub fn is_notification(&self) -> bool {
        matches!(self, Self::Notification(_))
    }

    pub fn is_response(&self) -> bool {
        matches!(self, Self::Response(_))
    }
}

/// Request ID (string or number)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    String(String),
    Number(i64),
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => write!(f, "{}", s),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

/// JSON-RPC request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpRequest {
    pub jsonrpc: String,
    pub id: RequestId,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl McpRequest {
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: id.into(),
            method: method.into(),
            params: None,
        }
    }
}

/// JSON-RPC response
///
/// `id` is `null` only for errors raised before a request id could be read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    pub id: Option<RequestId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<McpRpcError>,
}

impl McpResponse {
    /// Create a success response
    pub fn success(id: impl Into<RequestId>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(id.into()),
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: impl Into<RequestId>, error: McpRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(id.into()),
            result: None,
            error: Some(error),
        }
    }

    /// Error response for a message whose id is unknown
    pub fn error_without_id(error: McpRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: None,
            result: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Get the result, consuming the response
    pub fn into_result(self) -> Result<Value, McpRpcError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpRpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl McpRpcError {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn parse_error() -> Self {
        Self::new(Self::PARSE_ERROR, "Parse error")
    }

    pub fn invalid_request() -> Self {
        Self::new(Self::INVALID_REQUEST, "Invalid request")
    }

    pub fn method_not_found() -> Self {
        Self::new(Self::METHOD_NOT_FOUND, "Method not found")
    }

    pub fn invalid_params() -> Self {
        Self::new(Self::INVALID_PARAMS, "Invalid params")
    }

    pub fn internal_error() -> Self {
        Self::new(Self::INTERNAL_ERROR, "Internal error")
    }
}

impl std::fmt::Display for McpRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for McpRpcError {}

/// JSON-RPC notification (no id, no response expected)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpNotification {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Decode one line into a message
///
/// Returns the error response to send back when the line is not valid JSON
/// (`-32700`) or not a JSON-RPC message (`-32600`).
pub fn decode_message(line: &str) -> Result<McpMessage, McpResponse> {
    let value: Value = serde_json::from_str(line).map_err(|e| {
        McpResponse::error_without_id(McpRpcError::parse_error().with_data(e.to_string().into()))
    })?;

    serde_json::from_value(value).map_err(|e| {
        McpResponse::error_without_id(
            McpRpcError::invalid_request().with_data(e.to_string().into()),
        )
    })
}

/// MCP method names
pub mod methods {
    pub const INITIALIZE: &str = "initialize";
    pub const INITIALIZED: &str = "notifications/initialized";
    pub const PING: &str = "ping";
    pub const TOOLS_LIST: &str = "tools/list";
    pub const TOOLS_CALL: &str = "tools/call";
    pub const CANCELLED: &str = "notifications/cancelled";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_request_and_notification() {
        let msg = decode_message(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#).unwrap();
        assert!(msg.is_request());

        let msg = decode_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .unwrap();
        assert!(msg.is_notification());

        let msg = decode_message(r#"{"jsonrpc":"2.0","id":"a","result":{}}"#).unwrap();
        assert!(msg.is_response());
    }

    #[test]
    fn test_decode_garbage_is_parse_error() {
        let response = decode_message("{not json").unwrap_err();
        assert!(response.id.is_none());
        assert_eq!(response.error.unwrap().code, McpRpcError::PARSE_ERROR);
    }

    #[test]
    fn test_decode_non_message_is_invalid_request() {
        let response = decode_message("[1, 2, 3]").unwrap_err();
        assert_eq!(response.error.unwrap().code, McpRpcError::INVALID_REQUEST);
    }

    #[test]
    fn test_error_without_id_serializes_null_id() {
        let response = McpResponse::error_without_id(McpRpcError::parse_error());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["id"], Value::Null);
        assert_eq!(value["error"]["code"], -32700);
        assert!(value.get("result").is_none());
    }

    #[test]
    fn test_response_round_trip() {
        let res = McpResponse::success("req-7", json!({"status": "ok"}));
        assert!(res.is_success());
        assert_eq!(res.id, Some(RequestId::from("req-7")));
        assert_eq!(res.into_result().unwrap()["status"], "ok");

        let res = McpResponse::error(3i64, McpRpcError::method_not_found());
        assert_eq!(res.into_result().unwrap_err().code, -32601);
    }

    #[test]
    fn test_request_id_display() {
        assert_eq!(RequestId::from(42i64).to_string(), "42");
        assert_eq!(RequestId::from("abc").to_string(), "abc");
    }
}
