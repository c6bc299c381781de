//! MCP server exposing the tool registry over stdio
//!
//! Requests are read on the calling task. Every `tools/call` runs on its own
//! task, gated by a semaphore, and all responses go through one writer task
//! so lines never interleave.

use crate::config::Config;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{
    McpMessage, McpNotification, McpRequest, McpResponse, McpRpcError, RequestId,
    MCP_PROTOCOL_VERSION, decode_message, methods,
};
use crate::mcp::transport::{InboundLine, MessageReader, MessageWriter};
use crate::mcp::types::{
    CallToolParams, CancelledParams, InitializeResult, McpCapabilities, McpServerInfo, McpTool,
    McpToolResult, ToolCapabilities,
};
use crate::tools::{ExecutionContext, ModifiesResource, ToolCall, ToolRegistry};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// The only tool name `tools/call` accepts
pub const ALLOWED_TOOL: &str = "kubectl";

/// Server settings fixed at startup
#[derive(Debug, Clone)]
pub struct McpServerOptions {
    /// Name reported in `serverInfo`
    pub name: String,
    /// Version reported in `serverInfo`
    pub version: String,
    /// Kubeconfig path handed to every call; empty means kubectl's default
    pub kubeconfig: String,
    /// Working directory shared by every call
    pub workdir: PathBuf,
    pub max_concurrent_ops: usize,
    pub operation_timeout: Option<Duration>,
}

impl Default for McpServerOptions {
    fn default() -> Self {
        Self {
            name: "kubeguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            kubeconfig: String::new(),
            workdir: std::env::temp_dir().join("kubeguard"),
            max_concurrent_ops: 5,
            operation_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl McpServerOptions {
    /// Options taken from a loaded configuration
    pub fn from_config(config: &Config, kubeconfig: impl Into<String>, workdir: PathBuf) -> Self {
        Self {
            name: config.name.clone(),
            version: config.version.clone(),
            kubeconfig: kubeconfig.into(),
            workdir,
            max_concurrent_ops: config.mcp.max_concurrent_ops,
            operation_timeout: config.mcp.timeout(),
        }
    }
}

type InFlight = Arc<Mutex<HashMap<RequestId, CancellationToken>>>;

/// MCP server over a tool registry
pub struct McpServer {
    options: McpServerOptions,
    registry: Arc<ToolRegistry>,
    shutdown: CancellationToken,
}

impl McpServer {
    pub fn new(registry: ToolRegistry, options: McpServerOptions) -> Self {
        Self {
            options,
            registry: Arc::new(registry),
            shutdown: CancellationToken::new(),
        }
    }

    /// Use an externally owned token; cancelling it stops the server
    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn options(&self) -> &McpServerOptions {
        &self.options
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Tool definitions as returned by `tools/list`
    pub fn list_tools(&self) -> Vec<McpTool> {
        self.registry
            .all_tools()
            .iter()
            .map(|tool| McpTool::from(tool.schema()))
            .collect()
    }

    /// Serve over the process's stdin and stdout
    pub async fn serve_stdio(self) -> Result<(), McpError> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve until the input reaches EOF or the shutdown token fires
    ///
    /// In-flight calls are cancelled on exit, and their results are still
    /// written before this returns.
    pub async fn serve<R, W>(self, reader: R, writer: W) -> Result<(), McpError>
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let server = Arc::new(self);
        let root = server.shutdown.child_token();
        let semaphore = Arc::new(Semaphore::new(server.options.max_concurrent_ops.max(1)));
        let in_flight: InFlight = Arc::new(Mutex::new(HashMap::new()));

        let (tx, mut rx) = mpsc::unbounded_channel::<McpResponse>();
        let writer_task = tokio::spawn(async move {
            let mut writer = MessageWriter::new(writer);
            while let Some(response) = rx.recv().await {
                writer
                    .send(&response)
                    .await
                    .map_err(|e| e.with_context("writing response"))?;
            }
            Ok::<(), McpError>(())
        });

        info!(
            name = %server.options.name,
            tools = server.registry.count(),
            max_concurrent_ops = server.options.max_concurrent_ops,
            "MCP server listening on stdio"
        );

        let mut reader = MessageReader::new(reader);
        let mut calls = JoinSet::new();
        let read_result = loop {
            let line = tokio::select! {
                _ = root.cancelled() => {
                    info!("shutdown requested");
                    break Ok(());
                }
                line = reader.next_line() => line,
            };

            let line = match line {
                Ok(Some(InboundLine::Text(line))) => line,
                Ok(Some(InboundLine::NotUtf8(reason))) => {
                    warn!(error = %reason, "rejecting non-UTF-8 input");
                    let error = McpRpcError::parse_error().with_data(reason.into());
                    let _ = tx.send(McpResponse::error_without_id(error));
                    continue;
                }
                Ok(None) => {
                    debug!("input closed");
                    break Ok(());
                }
                Err(e) => break Err(e.with_context("reading request")),
            };

            match decode_message(&line) {
                Ok(McpMessage::Request(request)) => {
                    if request.method == methods::TOOLS_CALL {
                        server.spawn_tool_call(
                            request,
                            &mut calls,
                            &root,
                            &semaphore,
                            &in_flight,
                            &tx,
                        );
                    } else {
                        let _ = tx.send(server.handle_request(request));
                    }
                }
                Ok(McpMessage::Notification(notification)) => {
                    server.handle_notification(notification, &in_flight);
                }
                Ok(McpMessage::Response(response)) => {
                    debug!(id = ?response.id, "ignoring response from client");
                }
                Err(response) => {
                    warn!(error = ?response.error, "rejecting undecodable message");
                    let _ = tx.send(response);
                }
            }
        };

        root.cancel();
        while let Some(joined) = calls.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "tool call task failed");
            }
        }

        drop(tx);
        let write_result = writer_task.await?;

        info!("MCP server stopped");
        read_result.and(write_result)
    }

    fn spawn_tool_call(
        self: &Arc<Self>,
        request: McpRequest,
        calls: &mut JoinSet<()>,
        root: &CancellationToken,
        semaphore: &Arc<Semaphore>,
        in_flight: &InFlight,
        tx: &mpsc::UnboundedSender<McpResponse>,
    ) {
        let id = request.id.clone();
        let params: CallToolParams = match request
            .params
            .map(serde_json::from_value)
            .transpose()
        {
            Ok(Some(params)) => params,
            Ok(None) => {
                let _ = tx.send(McpResponse::error(id, McpRpcError::invalid_params()));
                return;
            }
            Err(e) => {
                let error = McpRpcError::invalid_params().with_data(e.to_string().into());
                let _ = tx.send(McpResponse::error(id, error));
                return;
            }
        };

        let token = root.child_token();
        {
            let mut active = lock(in_flight);
            if active.contains_key(&id) {
                drop(active);
                warn!(id = %id, "rejecting tools/call with an id already in flight");
                let error = McpRpcError::invalid_request()
                    .with_data(Value::String(format!("request id {} is already in flight", id)));
                let _ = tx.send(McpResponse::error(id, error));
                return;
            }
            active.insert(id.clone(), token.clone());
        }

        let server = Arc::clone(self);
        let semaphore = Arc::clone(semaphore);
        let in_flight = Arc::clone(in_flight);
        let tx = tx.clone();
        calls.spawn(async move {
            // Queued calls that get cancelled still run so the tool reports it.
            let _permit = tokio::select! {
                permit = semaphore.acquire_owned() => permit.ok(),
                _ = token.cancelled() => None,
            };

            let result = server.call_tool(params, &id, token).await;
            lock(&in_flight).remove(&id);

            let response = match serde_json::to_value(&result) {
                Ok(value) => McpResponse::success(id, value),
                Err(e) => McpResponse::error(
                    id,
                    McpRpcError::internal_error().with_data(e.to_string().into()),
                ),
            };
            let _ = tx.send(response);
        });
    }

    /// Answer a request other than `tools/call`
    pub fn handle_request(&self, request: McpRequest) -> McpResponse {
        debug!(method = %request.method, id = %request.id, "handling request");

        match request.method.as_str() {
            methods::INITIALIZE => {
                let result = InitializeResult {
                    protocol_version: MCP_PROTOCOL_VERSION.to_string(),
                    capabilities: McpCapabilities {
                        tools: Some(ToolCapabilities { list_changed: true }),
                    },
                    server_info: McpServerInfo {
                        name: self.options.name.clone(),
                        version: self.options.version.clone(),
                    },
                };
                to_response(request.id, &result)
            }
            methods::PING => McpResponse::success(request.id, json!({})),
            methods::TOOLS_LIST => {
                McpResponse::success(request.id, json!({ "tools": self.list_tools() }))
            }
            other => McpResponse::error(
                request.id,
                McpRpcError::method_not_found().with_data(Value::String(other.to_string())),
            ),
        }
    }

    fn handle_notification(&self, notification: McpNotification, in_flight: &InFlight) {
        match notification.method.as_str() {
            methods::INITIALIZED => debug!("client initialized"),
            methods::CANCELLED => {
                let params = notification
                    .params
                    .map(serde_json::from_value::<CancelledParams>);
                match params {
                    Some(Ok(params)) => {
                        if let Some(token) = lock(in_flight).get(&params.request_id) {
                            info!(
                                id = %params.request_id,
                                reason = params.reason.as_deref().unwrap_or(""),
                                "cancelling tool call"
                            );
                            token.cancel();
                        }
                    }
                    _ => warn!("malformed cancellation notification"),
                }
            }
            other => debug!(method = %other, "ignoring notification"),
        }
    }

    /// Run one `tools/call`
    ///
    /// Argument shape problems and non-permitted tools produce an error
    /// result. Anything the tool itself reports, including security
    /// rejections, comes back as the serialized execution result.
    #[instrument(skip(self, params, token), fields(tool = %params.name))]
    pub async fn call_tool(
        &self,
        params: CallToolParams,
        request_id: &RequestId,
        token: CancellationToken,
    ) -> McpToolResult {
        let name = params.name;
        let arguments = match params.arguments {
            Value::Object(map) => map,
            _ => return McpToolResult::error("Invalid arguments format: expected a map"),
        };

        let command = match arguments.get("command") {
            None => return McpToolResult::error("Missing required parameter: command"),
            Some(Value::String(command)) => command.clone(),
            Some(_) => return McpToolResult::error("Parameter 'command' must be a string"),
        };

        let claimed = arguments
            .get("modifies_resource")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        info!(command = %command, modifies_resource = %claimed, "received tool call");

        if name != ALLOWED_TOOL {
            warn!(tool = %name, "security warning: attempt to use non-kubectl tool");
            return McpToolResult::error(format!(
                "Only kubectl tool is allowed, tool {} is not permitted",
                name
            ));
        }

        let Some(tool) = self.registry.get(&name) else {
            return McpToolResult::error(format!("Tool {} not found", name));
        };

        let mut call_arguments = HashMap::new();
        call_arguments.insert("command".to_string(), Value::String(command));
        if !claimed.is_empty() {
            call_arguments.insert("modifies_resource".to_string(), Value::String(claimed.clone()));
        }
        let call = ToolCall::new(request_id.to_string(), name.clone(), call_arguments);

        let computed = tool.check_modifies_resource(&call);
        if let Ok(claimed) = claimed.parse::<ModifiesResource>() {
            if claimed != computed {
                warn!(
                    claimed = %claimed,
                    computed = %computed,
                    "modifies_resource claim disagrees with command classification"
                );
            }
        }

        let ctx = ExecutionContext::new(self.options.workdir.clone(), self.options.kubeconfig.clone())
            .with_cancellation(token)
            .with_timeout(self.options.operation_timeout);

        let result = tool.run(&ctx, &call).await;
        if result.is_error() {
            info!(error = %result.error, exit_code = result.exit_code, "tool call failed");
        } else {
            info!(output_bytes = result.stdout.len(), "tool call completed");
        }

        match serde_json::to_string(&result) {
            Ok(text) => McpToolResult::text(text),
            Err(e) => McpToolResult::error(format!("Error processing result: {}", e)),
        }
    }
}

fn to_response<T: serde::Serialize>(id: RequestId, result: &T) -> McpResponse {
    match serde_json::to_value(result) {
        Ok(value) => McpResponse::success(id, value),
        Err(e) => McpResponse::error(
            id,
            McpRpcError::internal_error().with_data(e.to_string().into()),
        ),
    }
}

fn lock(
    in_flight: &InFlight,
) -> std::sync::MutexGuard<'_, HashMap<RequestId, CancellationToken>> {
    in_flight
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
