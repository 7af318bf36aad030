/// Chat Tool
///
/// Sends one prompt to the LLM runtime and returns the generated text.

use serde_json::{Map, Value};

use super::{ToolCallResult, required_str};
use crate::core::error::GatewayError;
use crate::core::registry::ToolDefinition;
use crate::upstream::LlmBackend;

/// Model used when the caller omits `model` or passes an empty string.
pub const DEFAULT_MODEL: &str = "mistral:7b";

/// Registry entry for `chat`: a required `message` and an optional `model`.
pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "chat".to_string(),
        description: "Send a message to an LLM and get a response".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "message": {
                    "type": "string",
                    "description": "The message to send"
                },
                "model": {
                    "type": "string",
                    "description": "Model to use",
                    "default": DEFAULT_MODEL
                }
            },
            "required": ["message"]
        }),
    }
}

/// Send `message` to the LLM and return its full reply as one text block.
///
/// # Arguments
/// * `llm` - Backend that performs the generation
/// * `arguments` - Tool arguments; `message` is required, `model` is optional
///
/// # Returns
/// The generated text, or an error when `message` is missing or the upstream fails
pub async fn execute(llm: &dyn LlmBackend, arguments: &Map<String, Value>) -> Result<ToolCallResult, GatewayError> {
    let message = required_str(arguments, "message")?;
    // Empty or non-string `model` falls back to the default.
    let model = arguments
        .get("model")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_MODEL);

    let text = llm.generate(model, message).await?;
    Ok(ToolCallResult::text(text))
}
