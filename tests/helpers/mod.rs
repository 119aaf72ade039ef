use std::collections::BTreeMap;

use serde_json::{Value, json};
use workflow_serializer::catalog::*;
use workflow_serializer::ir::*;
use workflow_serializer::parse::*;

// =============================================================================
// Catalog
// =============================================================================

fn select_agent_tool(params: &ParamMap) -> Result<String, ToolSelectError> {
    match params.get("model").and_then(Value::as_str) {
        Some(model) if model.starts_with("claude") => Ok("anthropic_chat".into()),
        Some(_) => Ok("openai_chat".into()),
        None => Err(ToolSelectError::MissingParam("model".into())),
    }
}

fn default_temperature(_: &ParamMap) -> Option<Value> {
    Some(json!(0.7))
}

/// Catalog with a start block, an agent with a basic/advanced model pair,
/// a multi-operation mail block, an API block, a chat block whose basic
/// field shares its canonical id, and a webhook trigger.
pub fn test_catalog() -> InMemoryCatalog {
    InMemoryCatalog::new()
        .with_block(
            "starter",
            BlockSchema::new("Start", BlockCategory::Blocks)
                .with_sub_block(SubBlockConfig::new("inputFormat", "input-format").mode(SubBlockMode::Advanced)),
        )
        .with_block(
            "agent",
            BlockSchema::new("Agent", BlockCategory::Blocks)
                .with_sub_block(SubBlockConfig::new("systemPrompt", "long-input").title("System Prompt"))
                .with_sub_block(
                    SubBlockConfig::new("modelBasic", "dropdown")
                        .title("Model")
                        .mode(SubBlockMode::Basic)
                        .canonical("model"),
                )
                .with_sub_block(
                    SubBlockConfig::new("modelAdvanced", "short-input")
                        .title("Custom Model")
                        .mode(SubBlockMode::Advanced)
                        .canonical("model"),
                )
                .with_sub_block(
                    SubBlockConfig::new("temperature", "slider")
                        .default_value(DefaultValue::Computed(default_temperature)),
                )
                .with_sub_block(
                    SubBlockConfig::new("maxTokens", "short-input")
                        .mode(SubBlockMode::Advanced)
                        .default_value(DefaultValue::Static(json!(1024))),
                )
                .with_sub_block(SubBlockConfig::new("tools", "tool-input"))
                .with_sub_block(SubBlockConfig::new("responseFormat", "code").mode(SubBlockMode::Advanced))
                .with_tools(&["openai_chat", "anthropic_chat"])
                .with_selector(ToolSelector::Custom(select_agent_tool))
                .with_input("userPrompt", ParamType::String),
        )
        .with_block(
            "mail",
            BlockSchema::new("Mail", BlockCategory::Tools)
                .with_sub_block(SubBlockConfig::new("operation", "dropdown").title("Operation"))
                .with_sub_block(
                    SubBlockConfig::new("to", "short-input")
                        .title("Recipient")
                        .condition(VisibilityCondition::new(FieldCondition::equals("operation", "send"))),
                )
                .with_sub_block(
                    SubBlockConfig::new("subject", "short-input")
                        .title("Subject")
                        .condition(
                            VisibilityCondition::new(FieldCondition::equals("operation", "send"))
                                .and(FieldCondition::not_equals("format", "raw")),
                        ),
                )
                .with_sub_block(
                    SubBlockConfig::new("folder", "short-input")
                        .title("Folder")
                        .condition(VisibilityCondition::new(FieldCondition::equals(
                            "operation",
                            json!(["read", "search"]),
                        ))),
                )
                .with_sub_block(SubBlockConfig::new("format", "dropdown"))
                .with_tools(&["mail_send", "mail_read"])
                .with_selector(ToolSelector::ByParam {
                    param: "operation".into(),
                    tools: BTreeMap::from([
                        ("send".into(), "mail_send".into()),
                        ("read".into(), "mail_read".into()),
                        ("search".into(), "mail_read".into()),
                    ]),
                })
                .with_input("to", ParamType::String)
                .with_input("subject", ParamType::String),
        )
        .with_block(
            "api",
            BlockSchema::new("API", BlockCategory::Blocks)
                .with_sub_block(SubBlockConfig::new("url", "short-input").title("URL"))
                .with_sub_block(SubBlockConfig::new("method", "dropdown"))
                .with_tools(&["http_request"]),
        )
        .with_block(
            "slack",
            BlockSchema::new("Slack", BlockCategory::Tools)
                .with_sub_block(
                    SubBlockConfig::new("channel", "channel-selector")
                        .title("Channel")
                        .mode(SubBlockMode::Basic)
                        .canonical("channel"),
                )
                .with_sub_block(
                    SubBlockConfig::new("manualChannel", "short-input")
                        .mode(SubBlockMode::Advanced)
                        .canonical("channel"),
                )
                .with_sub_block(SubBlockConfig::new("text", "long-input").title("Message"))
                .with_tools(&["slack_message"]),
        )
        .with_block(
            "webhook",
            BlockSchema::new("Webhook", BlockCategory::Triggers)
                .with_sub_block(SubBlockConfig::new("path", "short-input").title("Path"))
                .with_sub_block(SubBlockConfig::new("secret", "short-input").mode(SubBlockMode::Trigger))
                .with_tools(&["webhook_receive"]),
        )
        .with_tool(
            "openai_chat",
            ToolSchema::default().with_param("model", ToolParam::required_user_only()),
        )
        .with_tool(
            "mail_send",
            ToolSchema::default()
                .with_param("to", ToolParam::required_user_only())
                .with_param("subject", ToolParam::required_user_only())
                .with_param(
                    "format",
                    ToolParam {
                        required: true,
                        visibility: ParamVisibility::UserOrLlm,
                    },
                ),
        )
        .with_tool(
            "mail_read",
            ToolSchema::default().with_param("folder", ToolParam::required_user_only()),
        )
        .with_tool(
            "http_request",
            ToolSchema::default().with_param("url", ToolParam::required_user_only()),
        )
        .with_tool(
            "slack_message",
            ToolSchema::default()
                .with_param("text", ToolParam::required_user_only())
                .with_param("channel", ToolParam::required_user_only()),
        )
        .with_tool(
            "webhook_receive",
            ToolSchema::default().with_param("path", ToolParam::required_user_only()),
        )
}

// =============================================================================
// Blocks
// =============================================================================

pub fn block(id: &str, block_type: &str, name: &str, values: &[(&str, Value)]) -> BlockState {
    let mut state = BlockState::new(id, block_type, name);
    for (sub_id, value) in values {
        state.sub_blocks.insert(
            sub_id.to_string(),
            SubBlockState {
                id: sub_id.to_string(),
                field_type: String::new(),
                value: value.clone(),
            },
        );
    }
    state
}

pub fn advanced(mut state: BlockState) -> BlockState {
    state.advanced_mode = Some(true);
    state
}

pub fn container(id: &str, block_type: &str, name: &str, data: Value) -> BlockState {
    let mut state = BlockState::new(id, block_type, name);
    state.data = data.as_object().cloned();
    state
}

pub fn blocks(list: Vec<BlockState>) -> BlockMap {
    list.into_iter().map(|b| (b.id.clone(), b)).collect()
}

// =============================================================================
// Edges and subflows
// =============================================================================

pub fn edge(source: &str, target: &str) -> Edge {
    Edge {
        id: format!("e-{source}-{target}"),
        source: source.into(),
        target: target.into(),
        source_handle: None,
        target_handle: None,
    }
}

pub fn for_each_loop(id: &str, nodes: &[&str], items: Option<Value>) -> Loop {
    Loop {
        id: id.into(),
        nodes: nodes.iter().map(|s| s.to_string()).collect(),
        iterations: 1,
        loop_type: LoopType::ForEach,
        for_each_items: items,
        while_condition: None,
    }
}

pub fn collection_parallel(id: &str, nodes: &[&str], distribution: Option<Value>) -> Parallel {
    Parallel {
        id: id.into(),
        nodes: nodes.iter().map(|s| s.to_string()).collect(),
        distribution,
        count: None,
        parallel_type: Some(ParallelType::Collection),
    }
}

pub fn loops(list: Vec<Loop>) -> BTreeMap<String, Loop> {
    list.into_iter().map(|l| (l.id.clone(), l)).collect()
}

pub fn parallels(list: Vec<Parallel>) -> BTreeMap<String, Parallel> {
    list.into_iter().map(|p| (p.id.clone(), p)).collect()
}

pub fn params(value: Value) -> ParamMap {
    value.as_object().cloned().unwrap()
}
