//! Required user-only parameter check (R001).
//!
//! Runs per block after parameter extraction, against the tool the block
//! resolves to.

use crate::catalog::{BlockSchema, Catalog, SubBlockConfig, SubBlockMode};
use crate::error::WorkflowValidationError;
use crate::parse::types::{BlockState, ParamMap, is_unset};

/// Fail if any required, user-only and currently active parameter of
/// `tool_id` has no value in `params`. Missing fields are listed in the
/// block's field order; params without a UI field come last.
pub fn validate_required_fields(
    block: &BlockState,
    schema: &BlockSchema,
    tool_id: &str,
    params: &ParamMap,
    catalog: &dyn Catalog,
) -> Result<(), WorkflowValidationError> {
    let trigger_mode = block.is_trigger_mode() || schema.is_trigger();
    if trigger_mode {
        return Ok(());
    }
    let Some(tool) = catalog.tool(tool_id) else {
        return Ok(());
    };
    let advanced_mode = block.is_advanced();

    let mut required: Vec<&str> = tool
        .params
        .iter()
        .filter(|(_, param)| param.is_user_required())
        .map(|(id, _)| id.as_str())
        .collect();
    required.sort_by_key(|param_id| field_position(schema, param_id));

    let mut missing = Vec::new();
    for param_id in required {
        let display_name = match candidate_sub_blocks(schema, param_id, advanced_mode) {
            // Params without a UI field are always checked.
            None => param_id,
            Some(candidates) => {
                let active = candidates
                    .into_iter()
                    .find(|s| s.mode.is_included(advanced_mode, trigger_mode) && s.is_visible(params));
                match active {
                    Some(sub_block) => sub_block.title.as_deref().unwrap_or(param_id),
                    None => continue,
                }
            }
        };

        if is_unset(params.get(param_id)) {
            missing.push(display_name.to_string());
        }
    }

    if missing.is_empty() {
        return Ok(());
    }

    let block_name = if block.name.is_empty() {
        schema.name.as_str()
    } else {
        block.name.as_str()
    };
    Err(WorkflowValidationError::new(
        "R001",
        format!("{} is missing required fields: {}", block_name, missing.join(", ")),
        &block.id,
        &block.block_type,
        block_name,
    ))
}

/// Index of the first sub-field feeding `param_id`.
fn field_position(schema: &BlockSchema, param_id: &str) -> usize {
    schema
        .sub_blocks
        .iter()
        .position(|s| feeds(s, param_id))
        .unwrap_or(usize::MAX)
}

fn feeds(sub_block: &SubBlockConfig, param_id: &str) -> bool {
    sub_block.id == param_id || sub_block.canonical_param_id.as_deref() == Some(param_id)
}

/// Sub-fields feeding `param_id`, directly or through a canonical id. Fields
/// matching the current mode come first.
fn candidate_sub_blocks<'a>(
    schema: &'a BlockSchema,
    param_id: &str,
    advanced_mode: bool,
) -> Option<Vec<&'a SubBlockConfig>> {
    let mut candidates: Vec<&SubBlockConfig> = schema
        .sub_blocks
        .iter()
        .filter(|s| feeds(s, param_id))
        .collect();
    if candidates.is_empty() {
        return None;
    }
    candidates.sort_by_key(|s| (s.mode == SubBlockMode::Advanced) != advanced_mode);
    Some(candidates)
}
