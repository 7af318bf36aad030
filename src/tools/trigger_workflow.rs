/// Trigger Workflow Tool
///
/// Not yet wired to n8n: there is no API key configuration, so the call is
/// validated and acknowledged without contacting the workflow engine.

use serde_json::{Map, Value};

use super::{ToolCallResult, required_str};
use crate::core::error::GatewayError;
use crate::core::registry::ToolDefinition;

/// Registry entry for `trigger_workflow`: a required `workflow_id` and an
/// optional `data` object.
pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "trigger_workflow".to_string(),
        description: "Trigger an n8n workflow".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "workflow_id": {
                    "type": "string",
                    "description": "ID of the workflow to trigger"
                },
                "data": {
                    "type": "object",
                    "description": "Data to pass to workflow"
                }
            },
            "required": ["workflow_id"]
        }),
    }
}

/// Acknowledge a workflow trigger without contacting n8n.
///
/// # Arguments
/// * `arguments` - Tool arguments; `workflow_id` is required, `data` must be an object if given
///
/// # Returns
/// `Workflow {id} triggered`, or an error for missing or ill-typed arguments
pub fn execute(arguments: &Map<String, Value>) -> Result<ToolCallResult, GatewayError> {
    let workflow_id = required_str(arguments, "workflow_id")?;
    let data = match arguments.get("data") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(data)) => data.clone(),
        Some(_) => {
            return Err(GatewayError::InvalidParams(
                "`data` must be an object".to_string(),
            ));
        }
    };

    // TODO: POST to the n8n webhook once N8N_API_KEY is configurable.
    tracing::warn!(
        workflow_id,
        data_keys = data.len(),
        "workflow backend not wired; acknowledging without dispatch"
    );

    Ok(ToolCallResult::text(format!("Workflow {workflow_id} triggered")))
}
