//! Serialization phase: editor workflow state ⇄ `SerializedWorkflow`.
//!
//! # Serialization steps
//!
//! 1. **Integrity**: edges and subflow registries only reference known blocks
//! 2. **Accessibility**: per-block reference scope from ancestry and subflows
//! 3. **Collections** (validated runs only): `forEach` / `collection` sources
//! 4. **Blocks**: parameter extraction, tool selection, required fields
//! 5. **Connections**: edges flattened to source/target/handles

pub mod access;
pub mod block;
pub mod canonical;
pub mod references;
pub mod response_format;
pub mod tool;

use std::collections::BTreeMap;

use uuid::Uuid;

pub use access::{AccessibilityMap, build_accessibility_map};
pub use block::{BlockContext, extract_params};
pub use canonical::{CanonicalGroup, canonical_groups, resolve_block_canonical_params, resolve_canonical_params};
pub use response_format::{parse_response_format_safely, try_parse_response_format};

use crate::catalog::Catalog;
use crate::error::SerializerResult;
use crate::ir::types::*;
use crate::parse::types::{BlockMap, BlockState, Edge, Loop, Parallel, WorkflowState};
use crate::validate::{validate_structural, validate_subflow_collections};

const TRACING_TARGET: &str = "workflow_serializer::serialize";

/// Per-call serialization settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Run the collection and required-field checks.
    pub validate_required: bool,
}

impl SerializeOptions {
    pub fn validated() -> Self {
        SerializeOptions {
            validate_required: true,
        }
    }
}

/// Converts workflows between editor state and IR against one catalog.
pub struct Serializer<'a> {
    catalog: &'a dyn Catalog,
}

impl<'a> Serializer<'a> {
    pub fn new(catalog: &'a dyn Catalog) -> Self {
        Self { catalog }
    }

    /// Serialize a full editor state.
    pub fn serialize_state(
        &self,
        state: &WorkflowState,
        options: SerializeOptions,
    ) -> SerializerResult<SerializedWorkflow> {
        self.serialize_workflow(
            &state.blocks,
            &state.edges,
            Some(&state.loops),
            Some(&state.parallels),
            options,
        )
    }

    /// Serialize blocks, edges and subflow registries into IR.
    ///
    /// Fails without partial output on an unknown block type, a dangling
    /// reference, or (when requested) a validation failure. The collection
    /// check runs before any block is serialized.
    pub fn serialize_workflow(
        &self,
        blocks: &BlockMap,
        edges: &[Edge],
        loops: Option<&BTreeMap<String, Loop>>,
        parallels: Option<&BTreeMap<String, Parallel>>,
        options: SerializeOptions,
    ) -> SerializerResult<SerializedWorkflow> {
        let no_loops = BTreeMap::new();
        let no_parallels = BTreeMap::new();
        let loops = loops.unwrap_or(&no_loops);
        let parallels = parallels.unwrap_or(&no_parallels);

        validate_structural(blocks, edges, loops, parallels)?;

        let access = build_accessibility_map(blocks, edges, loops, parallels);

        if options.validate_required {
            validate_subflow_collections(blocks, loops, parallels)?;
        }

        let names = references::block_name_index(blocks);
        let ctx = BlockContext {
            options,
            access: &access,
            names: &names,
        };
        let serialized_blocks = blocks
            .values()
            .map(|b| block::serialize_block(self.catalog, b, &ctx))
            .collect::<SerializerResult<Vec<_>>>()?;

        let connections: Vec<SerializedConnection> = edges.iter().map(serialize_connection).collect();

        tracing::debug!(
            target: TRACING_TARGET,
            block_count = serialized_blocks.len(),
            connection_count = connections.len(),
            loop_count = loops.len(),
            parallel_count = parallels.len(),
            validated = options.validate_required,
            "Serialized workflow"
        );

        Ok(SerializedWorkflow {
            version: WORKFLOW_VERSION.to_string(),
            blocks: serialized_blocks,
            connections,
            loops: loops.clone(),
            parallels: Some(parallels.clone()),
        })
    }

    pub fn serialize_block(&self, block: &BlockState, ctx: &BlockContext<'_>) -> SerializerResult<SerializedBlock> {
        block::serialize_block(self.catalog, block, ctx)
    }

    /// Rebuild editor state from IR. Edge ids are freshly generated.
    pub fn deserialize_workflow(&self, workflow: &SerializedWorkflow) -> SerializerResult<WorkflowState> {
        if workflow.version != WORKFLOW_VERSION {
            tracing::warn!(
                target: TRACING_TARGET,
                version = %workflow.version,
                expected = WORKFLOW_VERSION,
                "Deserializing workflow with unexpected version"
            );
        }

        let blocks = workflow
            .blocks
            .iter()
            .map(|b| self.deserialize_block(b).map(|state| (state.id.clone(), state)))
            .collect::<SerializerResult<BlockMap>>()?;

        let edges = workflow
            .connections
            .iter()
            .map(|c| Edge {
                id: Uuid::new_v4().to_string(),
                source: c.source.clone(),
                target: c.target.clone(),
                source_handle: c.source_handle.clone(),
                target_handle: c.target_handle.clone(),
            })
            .collect();

        tracing::debug!(
            target: TRACING_TARGET,
            block_count = blocks.len(),
            "Deserialized workflow"
        );

        Ok(WorkflowState {
            blocks,
            edges,
            loops: workflow.loops.clone(),
            parallels: workflow.parallels.clone().unwrap_or_default(),
        })
    }

    pub fn deserialize_block(&self, block: &SerializedBlock) -> SerializerResult<BlockState> {
        block::deserialize_block(self.catalog, block)
    }
}

fn serialize_connection(edge: &Edge) -> SerializedConnection {
    SerializedConnection {
        source: edge.source.clone(),
        target: edge.target.clone(),
        source_handle: edge.source_handle.clone().filter(|h| !h.is_empty()),
        target_handle: edge.target_handle.clone().filter(|h| !h.is_empty()),
        condition: None,
    }
}
