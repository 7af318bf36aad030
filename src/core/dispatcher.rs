/// JSON-RPC Dispatcher
///
/// Transport-independent request handling shared by the HTTP and STDIO
/// servers. Each call is independent: no session or conversation state is
/// kept between requests.

use std::sync::Arc;

use serde_json::{Value, json};

use crate::core::error::GatewayError;
use crate::core::protocol::{
    JSONRPC_VERSION, METHOD_NOT_FOUND, PROTOCOL_VERSION, RpcRequest, RpcResponse, SERVER_ERROR,
    SERVER_NAME, SERVER_VERSION,
};
use crate::core::registry::ToolRegistry;
use crate::tools::ToolExecutor;

/// MCP methods the gateway understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Initialize,
    ToolsList,
    ToolsCall,
    ResourcesList,
    PromptsList,
}

impl Method {
    /// Exact, case-sensitive match on the wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "initialize" => Some(Self::Initialize),
            "tools/list" => Some(Self::ToolsList),
            "tools/call" => Some(Self::ToolsCall),
            "resources/list" => Some(Self::ResourcesList),
            "prompts/list" => Some(Self::PromptsList),
            _ => None,
        }
    }
}

/// Why a request body could not be turned into an `RpcRequest`.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("request body must be a JSON object")]
    NotAnObject,
}

pub struct Dispatcher {
    tools: Arc<ToolRegistry>,
    executor: ToolExecutor,
}

impl Dispatcher {
    /// Create a dispatcher over a fixed tool catalog.
    ///
    /// # Arguments
    /// * `tools` - Catalog consulted for `tools/list` and for the unknown-tool check
    /// * `executor` - Runs a tool once its name is known to be registered
    pub fn new(tools: Arc<ToolRegistry>, executor: ToolExecutor) -> Self {
        Self { tools, executor }
    }

    /// Parse a raw body and dispatch it. A malformed body is returned as an
    /// error for the transport to report; it never reaches a method handler.
    pub async fn handle_body(&self, body: &[u8]) -> Result<RpcResponse, ParseError> {
        let value: Value = serde_json::from_slice(body)?;
        self.handle_value(value).await
    }

    /// Same as `handle_body` for an already-parsed JSON document.
    pub async fn handle_value(&self, value: Value) -> Result<RpcResponse, ParseError> {
        if !value.is_object() {
            return Err(ParseError::NotAnObject);
        }
        let request: RpcRequest = serde_json::from_value(value)?;
        Ok(self.dispatch(request).await)
    }

    /// Route a parsed request and wrap the outcome in a response carrying the
    /// request's id.
    pub async fn dispatch(&self, request: RpcRequest) -> RpcResponse {
        let RpcRequest {
            jsonrpc,
            method,
            params,
            id,
        } = request;

        if jsonrpc.as_ref().and_then(Value::as_str) != Some(JSONRPC_VERSION) {
            tracing::debug!(?jsonrpc, "request without jsonrpc \"2.0\" marker");
        }

        let Some(method) = method.as_str().and_then(Method::from_name) else {
            tracing::debug!(%method, "method not found");
            return RpcResponse::failure(id, METHOD_NOT_FOUND, "Method not found");
        };

        match self.call(method, params).await {
            Ok(result) => RpcResponse::success(id, result),
            Err(e) => {
                tracing::warn!(?method, error = %e, "request failed");
                RpcResponse::failure(id, SERVER_ERROR, e.to_string())
            }
        }
    }

    async fn call(&self, method: Method, params: Option<Value>) -> Result<Value, GatewayError> {
        match method {
            Method::Initialize => Ok(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": SERVER_VERSION
                }
            })),
            Method::ToolsList => Ok(json!({ "tools": self.tools.list_tools() })),
            Method::ToolsCall => self.call_tool(params).await,
            Method::ResourcesList => Ok(json!({ "resources": [] })),
            Method::PromptsList => Ok(json!({ "prompts": [] })),
        }
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, GatewayError> {
        let mut params = match params {
            Some(Value::Object(params)) => params,
            _ => return Err(GatewayError::InvalidParams("expected an object with `name`".to_string())),
        };

        let name = match params.get("name") {
            Some(Value::String(name)) => name.clone(),
            _ => return Err(GatewayError::InvalidParams("missing tool `name`".to_string())),
        };

        // Unregistered names never reach the executor.
        if self.tools.get(&name).is_none() {
            return Err(GatewayError::UnknownTool(name));
        }

        let result = self.executor.execute(&name, params.remove("arguments")).await?;
        Ok(json!(result))
    }
}
