//! Block and tool schema types supplied by the catalog.
//!
//! Everything except computed defaults and custom tool selectors is plain
//! data, so a catalog can be described in JSON. Function-backed variants are
//! only constructible in code.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::condition::VisibilityCondition;
use crate::ir::types::{BlockCategory, ParamType};
use crate::parse::types::ParamMap;

// =============================================================================
// BLOCK SCHEMA
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSchema {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: BlockCategory,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub sub_blocks: Vec<SubBlockConfig>,
    #[serde(default)]
    pub tools: ToolAccess,
    /// Declared input port types.
    #[serde(default)]
    pub inputs: BTreeMap<String, ParamType>,
}

impl BlockSchema {
    pub fn new(name: impl Into<String>, category: BlockCategory) -> Self {
        BlockSchema {
            name: name.into(),
            description: String::new(),
            category,
            color: String::new(),
            sub_blocks: Vec::new(),
            tools: ToolAccess::default(),
            inputs: BTreeMap::new(),
        }
    }

    pub fn with_sub_block(mut self, sub_block: SubBlockConfig) -> Self {
        self.sub_blocks.push(sub_block);
        self
    }

    pub fn with_tools(mut self, access: &[&str]) -> Self {
        self.tools.access = access.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_selector(mut self, selector: ToolSelector) -> Self {
        self.tools.selector = Some(selector);
        self
    }

    pub fn with_input(mut self, name: impl Into<String>, ty: ParamType) -> Self {
        self.inputs.insert(name.into(), ty);
        self
    }

    pub fn is_trigger(&self) -> bool {
        self.category == BlockCategory::Triggers
    }

    /// Sub-field configs declared under `id`. Several configs may share an
    /// id when they differ only by visibility condition.
    pub fn sub_blocks_by_id<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a SubBlockConfig> {
        self.sub_blocks.iter().filter(move |s| s.id == id)
    }
}

// =============================================================================
// SUB-FIELDS
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubBlockMode {
    Basic,
    Advanced,
    #[default]
    Both,
    Trigger,
}

impl SubBlockMode {
    /// Whether a field with this mode contributes to the parameter bag.
    pub fn is_included(self, advanced_mode: bool, trigger_mode: bool) -> bool {
        match self {
            SubBlockMode::Advanced => advanced_mode,
            SubBlockMode::Trigger => trigger_mode,
            SubBlockMode::Basic | SubBlockMode::Both => true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubBlockConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default)]
    pub field_type: String,
    #[serde(default)]
    pub mode: SubBlockMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_param_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<VisibilityCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<DefaultValue>,
}

impl SubBlockConfig {
    pub fn new(id: impl Into<String>, field_type: impl Into<String>) -> Self {
        SubBlockConfig {
            id: id.into(),
            title: None,
            field_type: field_type.into(),
            mode: SubBlockMode::Both,
            canonical_param_id: None,
            condition: None,
            default_value: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn mode(mut self, mode: SubBlockMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn canonical(mut self, canonical_id: impl Into<String>) -> Self {
        self.canonical_param_id = Some(canonical_id.into());
        self
    }

    pub fn condition(mut self, condition: VisibilityCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn default_value(mut self, default: DefaultValue) -> Self {
        self.default_value = Some(default);
        self
    }

    /// Visible given the current params; fields without a condition always are.
    pub fn is_visible(&self, params: &ParamMap) -> bool {
        self.condition.as_ref().is_none_or(|c| c.evaluate(params))
    }
}

pub type DefaultValueFn = fn(&ParamMap) -> Option<Value>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DefaultValue {
    Static(Value),
    /// Derived from the params collected so far.
    #[serde(skip)]
    Computed(DefaultValueFn),
}

impl DefaultValue {
    pub fn resolve(&self, params: &ParamMap) -> Option<Value> {
        match self {
            DefaultValue::Static(v) => Some(v.clone()),
            DefaultValue::Computed(f) => f(params),
        }
    }
}

// =============================================================================
// TOOL SELECTION
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolAccess {
    /// Declared tool ids; the first is the fallback.
    #[serde(default)]
    pub access: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<ToolSelector>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolSelectError {
    #[error("parameter '{0}' is not set")]
    MissingParam(String),
    #[error("no tool mapped for {param} = {value}")]
    Unmapped { param: String, value: String },
    #[error("{0}")]
    Failed(String),
}

pub type ToolSelectFn = fn(&ParamMap) -> Result<String, ToolSelectError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolSelector {
    /// Pick the tool mapped from the string value of one parameter.
    ByParam {
        param: String,
        tools: BTreeMap<String, String>,
    },
    #[serde(skip)]
    Custom(ToolSelectFn),
}

impl ToolSelector {
    pub fn select(&self, params: &ParamMap) -> Result<String, ToolSelectError> {
        match self {
            ToolSelector::ByParam { param, tools } => {
                let value = match params.get(param) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Null) | None => {
                        return Err(ToolSelectError::MissingParam(param.clone()));
                    }
                    Some(other) => other.to_string(),
                };
                tools.get(&value).cloned().ok_or(ToolSelectError::Unmapped {
                    param: param.clone(),
                    value,
                })
            }
            ToolSelector::Custom(f) => f(params),
        }
    }
}

// =============================================================================
// TOOL SCHEMA
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParamVisibility {
    #[default]
    UserOrLlm,
    UserOnly,
    LlmOnly,
    Hidden,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolParam {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub visibility: ParamVisibility,
}

impl ToolParam {
    pub fn required_user_only() -> Self {
        ToolParam {
            required: true,
            visibility: ParamVisibility::UserOnly,
        }
    }

    /// Must be supplied by the user before the workflow can run.
    pub fn is_user_required(&self) -> bool {
        self.required && self.visibility == ParamVisibility::UserOnly
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolSchema {
    #[serde(default)]
    pub params: BTreeMap<String, ToolParam>,
}

impl ToolSchema {
    pub fn with_param(mut self, name: impl Into<String>, param: ToolParam) -> Self {
        self.params.insert(name.into(), param);
        self
    }
}
