//! IR type definitions: the persisted, execution-ready form of a workflow.
//!
//! `SerializedWorkflow` is the durable contract between the editor, storage
//! and the executor. Readers of stored workflows rely on `version: "1.0"`,
//! so field names and optionality here must not drift.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::parse::types::{Loop, Parallel, ParamMap, Position};

/// Version tag written into every serialized workflow.
pub const WORKFLOW_VERSION: &str = "1.0";

// =============================================================================
// TOP-LEVEL IR
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedWorkflow {
    pub version: String,
    /// Blocks in editor order.
    pub blocks: Vec<SerializedBlock>,
    pub connections: Vec<SerializedConnection>,
    #[serde(default)]
    pub loops: BTreeMap<String, SerializedLoop>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallels: Option<BTreeMap<String, SerializedParallel>>,
}

impl SerializedWorkflow {
    pub fn block(&self, id: &str) -> Option<&SerializedBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }
}

/// Loop entries are persisted in the same shape as the editor registry.
pub type SerializedLoop = Loop;

/// Parallel entries are persisted in the same shape as the editor registry.
pub type SerializedParallel = Parallel;

// =============================================================================
// BLOCKS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedBlock {
    pub id: String,
    pub position: Position,
    pub config: BlockConfig,
    /// Declared input port types. Values never appear here.
    #[serde(default)]
    pub inputs: BTreeMap<String, ParamType>,
    /// Declared output shapes plus an optional parsed `responseFormat`.
    #[serde(default)]
    pub outputs: Map<String, Value>,
    pub metadata: BlockMetadata,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockConfig {
    /// Resolved tool id; empty for containers and tool-less blocks.
    pub tool: String,
    #[serde(default)]
    pub params: ParamMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockMetadata {
    /// The block type.
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: BlockCategory,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockCategory {
    Blocks,
    Tools,
    Triggers,
    /// Loop and parallel containers.
    Subflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Boolean,
    Json,
    Array,
    Object,
    Any,
}

// =============================================================================
// CONNECTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedConnection {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    /// Routing condition, evaluated by the executor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConnectionCondition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionCondition {
    #[serde(rename = "type")]
    pub kind: ConditionKind,
    pub expression: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionKind {
    #[serde(rename = "if")]
    If,
    #[serde(rename = "else if")]
    ElseIf,
    #[serde(rename = "else")]
    Else,
}
