//! Rust types mirroring the editor's workflow store.
//!
//! These types are the serde target for the UI-side workflow JSON and the
//! output of deserialization. Field names stay camelCase to match the store.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Blocks keyed by id, in editor order.
pub type BlockMap = IndexMap<String, BlockState>;

/// Flat parameter bag keyed by sub-field or canonical parameter id.
pub type ParamMap = Map<String, Value>;

/// Absent, null and empty-string values all count as "not set".
pub fn is_unset(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

// =============================================================================
// TOP-LEVEL WORKFLOW STATE
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowState {
    #[serde(default)]
    pub blocks: BlockMap,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub loops: BTreeMap<String, Loop>,
    #[serde(default)]
    pub parallels: BTreeMap<String, Parallel>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

// =============================================================================
// BLOCKS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockState {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    pub name: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub sub_blocks: BTreeMap<String, SubBlockState>,
    #[serde(default)]
    pub outputs: Map<String, Value>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal_handles: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_wide: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Opaque container config (loop/parallel kind, source, count).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

fn default_enabled() -> bool {
    true
}

impl BlockState {
    pub fn new(id: impl Into<String>, block_type: impl Into<String>, name: impl Into<String>) -> Self {
        BlockState {
            id: id.into(),
            block_type: block_type.into(),
            name: name.into(),
            position: Position::default(),
            sub_blocks: BTreeMap::new(),
            outputs: Map::new(),
            enabled: true,
            advanced_mode: None,
            trigger_mode: None,
            horizontal_handles: None,
            is_wide: None,
            height: None,
            data: None,
        }
    }

    pub fn is_advanced(&self) -> bool {
        self.advanced_mode.unwrap_or(false)
    }

    pub fn is_trigger_mode(&self) -> bool {
        self.trigger_mode.unwrap_or(false)
    }

    /// Current value of a sub-field, `None` when unset or null.
    pub fn sub_block_value(&self, id: &str) -> Option<&Value> {
        self.sub_blocks
            .get(id)
            .map(|s| &s.value)
            .filter(|v| !v.is_null())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubBlockState {
    pub id: String,
    #[serde(rename = "type", default)]
    pub field_type: String,
    #[serde(default)]
    pub value: Value,
}

// =============================================================================
// SUBFLOW REGISTRIES
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopType {
    #[default]
    #[serde(rename = "for")]
    For,
    #[serde(rename = "forEach")]
    ForEach,
    #[serde(rename = "while")]
    While,
    #[serde(rename = "doWhile")]
    DoWhile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loop {
    pub id: String,
    #[serde(default)]
    pub nodes: Vec<String>,
    #[serde(default)]
    pub iterations: u32,
    #[serde(default)]
    pub loop_type: LoopType,
    /// Array, object, JSON string or runtime expression for `forEach` loops.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub for_each_items: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub while_condition: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParallelType {
    #[default]
    Count,
    Collection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parallel {
    pub id: String,
    #[serde(default)]
    pub nodes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel_type: Option<ParallelType>,
}
