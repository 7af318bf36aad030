/// List Models Tool
///
/// Returns the LLM runtime's installed models, JSON-serialized into a single
/// text block.

use super::ToolCallResult;
use crate::core::error::GatewayError;
use crate::core::registry::ToolDefinition;
use crate::upstream::LlmBackend;

/// Registry entry for `list_models`, which takes no arguments.
pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "list_models".to_string(),
        description: "List available LLM models".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {}
        }),
    }
}

/// Fetch the backend's installed models.
///
/// # Arguments
/// * `llm` - Backend to query
///
/// # Returns
/// The upstream `models` array serialized as compact JSON text
pub async fn execute(llm: &dyn LlmBackend) -> Result<ToolCallResult, GatewayError> {
    let models = llm.list_models().await?;
    Ok(ToolCallResult::text(models.to_string()))
}
