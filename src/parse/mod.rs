//! Parse phase: editor JSON → Rust types + edge graph.

pub mod graph;
pub mod types;

pub use graph::WorkflowGraph;
pub use types::*;

use crate::error::{SerializerError, SerializerResult};
use crate::ir::SerializedWorkflow;

/// Deserialize an editor workflow-state JSON string.
pub fn parse_workflow_state(json: &str) -> SerializerResult<WorkflowState> {
    serde_json::from_str::<WorkflowState>(json).map_err(|e| SerializerError::parse("workflow", e))
}

/// Deserialize a persisted `SerializedWorkflow` JSON string.
pub fn parse_serialized_workflow(json: &str) -> SerializerResult<SerializedWorkflow> {
    serde_json::from_str::<SerializedWorkflow>(json)
        .map_err(|e| SerializerError::parse("serialized workflow", e))
}
