//! JSON-RPC tool protocol shared by every transport.
//!
//! Implements the subset of the Model Context Protocol a tool-only server
//! needs: `initialize`, `ping`, `tools/list`, `tools/call` and notifications.
//! Transports hand raw messages to [`ToolServer::handle_message`] and relay
//! whatever comes back.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::tools::{DETAIL_TOOL, LIST_TOOL, PediaTools};
use crate::{PKG_VERSION, ToolEnvelope};

/// Protocol revision announced when the client does not ask for one.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2025-03-26";

/// Name reported in `initialize`.
pub const SERVER_NAME: &str = "Pedia MCP";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

/// Incoming JSON-RPC message. A missing `id` marks a notification.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// Outgoing JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl JsonRpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Dispatches protocol messages to the query tools.
#[derive(Clone)]
pub struct ToolServer {
    tools: PediaTools,
}

impl ToolServer {
    pub fn new(tools: PediaTools) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &PediaTools {
        &self.tools
    }

    /// Handle one raw message. Returns `None` for notifications.
    pub async fn handle_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "unparseable message");
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    RpcError::new(PARSE_ERROR, format!("parse error: {e}")),
                ));
            }
        };
        self.handle_value(value).await
    }

    /// Handle one already-parsed message.
    pub async fn handle_value(&self, value: Value) -> Option<JsonRpcResponse> {
        let id_hint = value.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                return Some(JsonRpcResponse::failure(
                    id_hint,
                    RpcError::new(INVALID_REQUEST, format!("invalid request: {e}")),
                ));
            }
        };
        self.handle(request).await
    }

    /// Handle a decoded request.
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!(method = %request.method, "request");
        let Some(id) = request.id else {
            // Notifications (initialized, cancelled, ...) need no answer.
            return None;
        };

        let params = request.params.unwrap_or(Value::Null);
        let outcome = match request.method.as_str() {
            "initialize" => Ok(initialize_result(&params)),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(tools_list_result()),
            "tools/call" => self.call_tool(&params).await,
            other => Err(RpcError::new(
                METHOD_NOT_FOUND,
                format!("method not found: {other}"),
            )),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::failure(id, error),
        })
    }

    /// Run a `tools/call` request.
    ///
    /// Envelopes (validation errors included) become ordinary tool results.
    /// Upstream exhaustion becomes a tool result flagged `isError`.
    pub async fn call_tool(&self, params: &Value) -> Result<Value, RpcError> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| RpcError::new(INVALID_PARAMS, "missing tool name"))?;
        let args = params.get("arguments").cloned().unwrap_or(Value::Null);

        let outcome = match name {
            LIST_TOOL => {
                let keyword = string_arg(&args, "keyword");
                let page = page_arg(&args)?;
                self.tools.pedia_list(&keyword, page).await
            }
            DETAIL_TOOL => {
                let term = string_arg(&args, "term");
                self.tools.pedia_detail(&term).await
            }
            other => {
                return Err(RpcError::new(
                    INVALID_PARAMS,
                    format!("unknown tool: {other}"),
                ));
            }
        };

        Ok(match outcome {
            Ok(envelope) => envelope_result(&envelope),
            Err(e) => {
                warn!(tool = name, error = %e, "tool call failed");
                json!({
                    "content": [{ "type": "text", "text": e.to_string() }],
                    "isError": true,
                })
            }
        })
    }
}

/// Missing or non-string arguments read as empty, which the tools reject.
fn string_arg(args: &Value, name: &str) -> String {
    args.get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// `page` defaults to 1 and accepts integers or integer strings.
fn page_arg(args: &Value) -> Result<i64, RpcError> {
    match args.get("page") {
        None | Some(Value::Null) => Ok(1),
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| RpcError::new(INVALID_PARAMS, "page must be an integer")),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| RpcError::new(INVALID_PARAMS, "page must be an integer")),
        Some(_) => Err(RpcError::new(INVALID_PARAMS, "page must be an integer")),
    }
}

fn envelope_result(envelope: &ToolEnvelope) -> Value {
    let structured = serde_json::to_value(envelope).unwrap_or(Value::Null);
    json!({
        "content": [{ "type": "text", "text": structured.to_string() }],
        "structuredContent": structured,
        "isError": false,
    })
}

fn initialize_result(params: &Value) -> Value {
    let version = params
        .get("protocolVersion")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_PROTOCOL_VERSION);
    json!({
        "protocolVersion": version,
        "capabilities": { "tools": {} },
        "serverInfo": { "name": SERVER_NAME, "version": PKG_VERSION },
    })
}

fn tools_list_result() -> Value {
    json!({
        "tools": [
            {
                "name": LIST_TOOL,
                "description": "Search the Pedia encyclopedia by keyword and list matching entries.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "keyword": { "type": "string", "description": "Search keyword" },
                        "page": { "type": "integer", "description": "Result page", "default": 1 }
                    },
                    "required": ["keyword"]
                }
            },
            {
                "name": DETAIL_TOOL,
                "description": "Fetch the full Pedia encyclopedia entry for a term.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "term": { "type": "string", "description": "Exact term to look up" }
                    },
                    "required": ["term"]
                }
            }
        ]
    })
}
