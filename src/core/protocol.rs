/// JSON-RPC 2.0 Envelopes
///
/// Request and response structures for the MCP wire protocol, plus the fixed
/// protocol identity the gateway reports.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Name and version reported in `initialize`.
pub const SERVER_NAME: &str = "ziggie-mcp-gateway";
pub const SERVER_VERSION: &str = "1.0.0";

/// Service identity reported by the HTTP introspection routes.
pub const SERVICE_ID: &str = "mcp-gateway";
pub const SERVICE_TITLE: &str = "Ziggie MCP Gateway";

pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const SERVER_ERROR: i32 = -32000;

/// Inbound JSON-RPC request.
///
/// Every field is optional on the wire: a missing or non-string `method`
/// routes to "Method not found" and a missing `id` is answered with `id: null`.
#[derive(Deserialize, Debug, Default)]
pub struct RpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<Value>,
    #[serde(default)]
    pub method: Value,
    #[serde(default)]
    pub params: Option<Value>,
    /// Caller-supplied correlation id, echoed verbatim.
    #[serde(default)]
    pub id: Value,
}

/// Outbound JSON-RPC response. Exactly one of `result` / `error` is set.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RpcResponse {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
    id: Value,
}

/// The `error` member of a failed response.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl RpcResponse {
    /// Build a successful response.
    ///
    /// # Arguments
    /// * `id` - The request's id, echoed verbatim (including `null`)
    /// * `result` - Method result placed under `result`
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Build an error response with no `result` key.
    ///
    /// # Arguments
    /// * `id` - The request's id, echoed verbatim (including `null`)
    /// * `code` - JSON-RPC error code, such as `METHOD_NOT_FOUND`
    /// * `message` - Human-readable error text
    pub fn failure(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
            id,
        }
    }
}
