/// Tools Module
///
/// Each built-in tool lives in its own module exporting a `definition()` for
/// the registry and an `execute` function for `tools/call`. `ToolExecutor`
/// routes a tool name to the right module and normalizes every outcome into a
/// `ToolCallResult`.

pub mod chat;
pub mod list_models;
pub mod trigger_workflow;

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::error::GatewayError;
use crate::core::registry::ToolDefinition;
use crate::upstream::LlmBackend;

/// The closed set of tools this gateway can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Chat,
    ListModels,
    TriggerWorkflow,
}

impl ToolKind {
    /// Registration order, as reported by `tools/list`.
    pub const ALL: [ToolKind; 3] = [ToolKind::Chat, ToolKind::ListModels, ToolKind::TriggerWorkflow];

    /// Wire name used in `tools/call` and `tools/list`.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Chat => "chat",
            ToolKind::ListModels => "list_models",
            ToolKind::TriggerWorkflow => "trigger_workflow",
        }
    }

    /// Exact, case-sensitive match on the wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Registry entry for `kind`.
pub fn definition(kind: ToolKind) -> ToolDefinition {
    match kind {
        ToolKind::Chat => chat::definition(),
        ToolKind::ListModels => list_models::definition(),
        ToolKind::TriggerWorkflow => trigger_workflow::definition(),
    }
}

/// A single `{type: "text", text}` content block.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

/// Uniform result shape of every tool execution.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ToolCallResult {
    pub content: Vec<ContentBlock>,
}

impl ToolCallResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock {
                kind: "text",
                text: text.into(),
            }],
        }
    }
}

/// Executes tools against their upstream services.
#[derive(Clone)]
pub struct ToolExecutor {
    llm: Arc<dyn LlmBackend>,
}

impl ToolExecutor {
    /// Create an executor whose LLM tools call `llm`.
    pub fn new(llm: Arc<dyn LlmBackend>) -> Self {
        Self { llm }
    }

    /// Run `name` with `arguments`. Absent arguments behave like `{}`.
    pub async fn execute(&self, name: &str, arguments: Option<Value>) -> Result<ToolCallResult, GatewayError> {
        let kind = ToolKind::from_name(name).ok_or_else(|| GatewayError::UnknownTool(name.to_string()))?;

        let arguments = match arguments {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(GatewayError::InvalidParams(
                    "`arguments` must be an object".to_string(),
                ));
            }
        };

        tracing::info!(tool = kind.name(), "executing tool");
        match kind {
            ToolKind::Chat => chat::execute(self.llm.as_ref(), &arguments).await,
            ToolKind::ListModels => list_models::execute(self.llm.as_ref()).await,
            ToolKind::TriggerWorkflow => trigger_workflow::execute(&arguments),
        }
    }
}

/// Fetch a required string argument.
fn required_str<'a>(arguments: &'a Map<String, Value>, key: &'static str) -> Result<&'a str, GatewayError> {
    arguments
        .get(key)
        .and_then(Value::as_str)
        .ok_or(GatewayError::MissingArgument(key))
}
