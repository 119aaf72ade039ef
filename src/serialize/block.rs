//! Single block serialization: UI block ⇄ `SerializedBlock`.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use super::SerializeOptions;
use super::access::{AccessibilityMap, is_start_block_type};
use super::canonical::{canonical_groups, resolve_block_canonical_params};
use super::references::find_scope_violations;
use super::response_format::parse_response_format_safely;
use super::tool::resolve_tool_id;
use crate::catalog::{BlockKind, BlockSchema, Catalog, ContainerKind};
use crate::error::SerializerResult;
use crate::ir::types::*;
use crate::parse::types::{BlockState, ParamMap, SubBlockState};
use crate::validate::validate_required_fields;

const TRACING_TARGET: &str = "workflow_serializer::block";

pub const TRIGGER_MODE_KEY: &str = "triggerMode";
pub const ADVANCED_MODE_KEY: &str = "advancedMode";
pub const RESPONSE_FORMAT_KEY: &str = "responseFormat";
/// Start-block field listing the workflow's declared inputs.
pub const INPUT_FORMAT_ID: &str = "inputFormat";

/// Per-call state shared by every block of one workflow.
pub struct BlockContext<'a> {
    pub options: SerializeOptions,
    pub access: &'a AccessibilityMap,
    /// Normalized block name → block id, for reference checks.
    pub names: &'a HashMap<String, String>,
}

pub fn serialize_block(
    catalog: &dyn Catalog,
    block: &BlockState,
    ctx: &BlockContext<'_>,
) -> SerializerResult<SerializedBlock> {
    match catalog.kind(&block.block_type)? {
        BlockKind::Container(kind) => Ok(serialize_container(block, kind)),
        BlockKind::Tool(schema) => serialize_tool_block(catalog, block, schema, ctx),
    }
}

fn serialize_container(block: &BlockState, kind: ContainerKind) -> SerializedBlock {
    SerializedBlock {
        id: block.id.clone(),
        position: block.position,
        config: BlockConfig {
            tool: String::new(),
            params: block.data.clone().unwrap_or_default(),
        },
        inputs: BTreeMap::new(),
        outputs: block.outputs.clone(),
        metadata: BlockMetadata {
            id: kind.type_id().to_string(),
            name: block.name.clone(),
            description: kind.description().to_string(),
            category: BlockCategory::Subflow,
            color: kind.color().to_string(),
        },
        enabled: block.enabled,
    }
}

fn serialize_tool_block(
    catalog: &dyn Catalog,
    block: &BlockState,
    schema: &BlockSchema,
    ctx: &BlockContext<'_>,
) -> SerializerResult<SerializedBlock> {
    let mut params = extract_params(block, schema);

    if block.is_trigger_mode() || schema.is_trigger() {
        params.insert(TRIGGER_MODE_KEY.into(), Value::Bool(true));
    }
    if block.is_advanced() {
        params.insert(ADVANCED_MODE_KEY.into(), Value::Bool(true));
    }

    let tool = resolve_tool_id(&block.id, &block.block_type, schema, &params);

    if ctx.options.validate_required {
        validate_required_fields(block, schema, &tool, &params, catalog)?;
    }

    for violation in find_scope_violations(&block.id, &params, ctx.names, ctx.access) {
        tracing::warn!(
            target: TRACING_TARGET,
            block_id = %block.id,
            param = %violation.param,
            reference = %violation.reference,
            target_id = %violation.target_id,
            "Parameter references a block that is not reachable from this block"
        );
    }

    let mut outputs = block.outputs.clone();
    if let Some(format) = params.get(RESPONSE_FORMAT_KEY).and_then(parse_response_format_safely) {
        outputs.insert(RESPONSE_FORMAT_KEY.into(), format);
    }

    tracing::trace!(
        target: TRACING_TARGET,
        block_id = %block.id,
        block_type = %block.block_type,
        tool = %tool,
        param_count = params.len(),
        "Serialized block"
    );

    Ok(SerializedBlock {
        id: block.id.clone(),
        position: block.position,
        config: BlockConfig { tool, params },
        inputs: schema.inputs.clone(),
        outputs,
        metadata: BlockMetadata {
            id: block.block_type.clone(),
            name: block.name.clone(),
            description: schema.description.clone(),
            category: schema.category,
            color: schema.color.clone(),
        },
        enabled: block.enabled,
    })
}

/// Collect the block's parameter bag: mode-compatible sub-field values,
/// catalog defaults for anything still unset, then canonical resolution.
pub fn extract_params(block: &BlockState, schema: &BlockSchema) -> ParamMap {
    let advanced_mode = block.is_advanced();
    let trigger_mode = block.is_trigger_mode() || schema.is_trigger();
    let keeps_input_format = is_start_block_type(&block.block_type) || trigger_mode;

    let mut params = ParamMap::new();
    for (id, sub_block) in &block.sub_blocks {
        let mut configs = schema.sub_blocks_by_id(id).peekable();
        // Fields unknown to the catalog are carried through as-is.
        let included = configs.peek().is_none()
            || configs.any(|c| c.mode.is_included(advanced_mode, trigger_mode));
        let input_format_list = keeps_input_format
            && id == INPUT_FORMAT_ID
            && sub_block.value.as_array().is_some_and(|a| !a.is_empty());

        if included || input_format_list {
            params.insert(id.clone(), sub_block.value.clone());
        }
    }

    for config in &schema.sub_blocks {
        if !config.mode.is_included(advanced_mode, trigger_mode) {
            continue;
        }
        let Some(default) = &config.default_value else {
            continue;
        };
        if params.get(&config.id).is_none_or(Value::is_null) {
            if let Some(value) = default.resolve(&params) {
                params.insert(config.id.clone(), value);
            }
        }
    }

    let groups = canonical_groups(&schema.sub_blocks);
    resolve_block_canonical_params(&groups, &mut params, advanced_mode, |id| block.sub_blocks.contains_key(id));
    params
}

pub fn deserialize_block(catalog: &dyn Catalog, block: &SerializedBlock) -> SerializerResult<BlockState> {
    let params = &block.config.params;

    let state = match catalog.kind(&block.metadata.id)? {
        BlockKind::Container(kind) => BlockState {
            data: Some(params.clone()),
            ..restore_common(block, kind.type_id(), kind.display_name())
        },
        BlockKind::Tool(schema) => {
            // Canonical values are not split back into their UI fields;
            // only fields whose id matches a param key get a value.
            let mut sub_blocks = BTreeMap::new();
            for config in &schema.sub_blocks {
                sub_blocks
                    .entry(config.id.clone())
                    .or_insert_with(|| SubBlockState {
                        id: config.id.clone(),
                        field_type: config.field_type.clone(),
                        value: params.get(&config.id).cloned().unwrap_or(Value::Null),
                    });
            }

            let trigger_mode = params.get(TRIGGER_MODE_KEY) == Some(&Value::Bool(true))
                || block.metadata.category == BlockCategory::Triggers
                || schema.is_trigger();
            let advanced_mode = params.get(ADVANCED_MODE_KEY) == Some(&Value::Bool(true));

            BlockState {
                sub_blocks,
                trigger_mode: trigger_mode.then_some(true),
                advanced_mode: advanced_mode.then_some(true),
                ..restore_common(block, &block.metadata.id, &schema.name)
            }
        }
    };

    Ok(state)
}

fn restore_common(block: &SerializedBlock, block_type: &str, fallback_name: &str) -> BlockState {
    let name = if block.metadata.name.is_empty() {
        fallback_name
    } else {
        block.metadata.name.as_str()
    };
    BlockState {
        position: block.position,
        outputs: block.outputs.clone(),
        enabled: block.enabled,
        ..BlockState::new(&block.id, block_type, name)
    }
}
