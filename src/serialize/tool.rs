//! Concrete tool selection for catalog blocks.

use serde_json::Value;

use crate::catalog::{BlockSchema, ToolSelectError};
use crate::parse::types::ParamMap;

const TRACING_TARGET: &str = "workflow_serializer::tool";

pub const AGENT_TYPE: &str = "agent";
const CUSTOM_TOOL_TYPE: &str = "custom-tool";

/// Run the block's selector over `params`.
///
/// Blocks without a selector use their first declared tool. Agent blocks
/// select over their catalog tools only; custom tools never influence the
/// choice and are left untouched in `params`.
pub fn select_tool(block_type: &str, schema: &BlockSchema, params: &ParamMap) -> Result<String, ToolSelectError> {
    let Some(selector) = &schema.tools.selector else {
        return Ok(default_tool(schema));
    };

    if block_type == AGENT_TYPE {
        if let Some(Value::Array(tools)) = params.get("tools") {
            let catalog_tools: Vec<Value> = tools
                .iter()
                .filter(|t| t.get("type").and_then(Value::as_str) != Some(CUSTOM_TOOL_TYPE))
                .cloned()
                .collect();
            let mut scoped = params.clone();
            scoped.insert("tools".into(), Value::Array(catalog_tools));
            return selector.select(&scoped);
        }
    }

    selector.select(params)
}

/// [`select_tool`] with selector failures logged and replaced by the first
/// declared tool.
pub fn resolve_tool_id(block_id: &str, block_type: &str, schema: &BlockSchema, params: &ParamMap) -> String {
    select_tool(block_type, schema, params).unwrap_or_else(|err| {
        let fallback = default_tool(schema);
        tracing::warn!(
            target: TRACING_TARGET,
            block_id,
            block_type,
            error = %err,
            fallback = %fallback,
            "Tool selection failed, using default tool"
        );
        fallback
    })
}

fn default_tool(schema: &BlockSchema) -> String {
    schema.tools.access.first().cloned().unwrap_or_default()
}
