//! Block and tool catalog boundary.
//!
//! The catalog is owned by the wider platform; this crate only reads from it
//! through [`Catalog`]. [`InMemoryCatalog`] is a map-backed implementation
//! that can be built in code or loaded from JSON.

pub mod condition;
pub mod schema;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use condition::{FieldCondition, VisibilityCondition};
pub use schema::*;

use crate::error::{SerializerError, SerializerResult};

/// Container block type ids. These never have catalog entries.
pub const LOOP_TYPE: &str = "loop";
pub const PARALLEL_TYPE: &str = "parallel";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Loop,
    Parallel,
}

impl ContainerKind {
    pub fn from_type(block_type: &str) -> Option<Self> {
        match block_type {
            LOOP_TYPE => Some(ContainerKind::Loop),
            PARALLEL_TYPE => Some(ContainerKind::Parallel),
            _ => None,
        }
    }

    pub fn type_id(self) -> &'static str {
        match self {
            ContainerKind::Loop => LOOP_TYPE,
            ContainerKind::Parallel => PARALLEL_TYPE,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ContainerKind::Loop => "Loop",
            ContainerKind::Parallel => "Parallel",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ContainerKind::Loop => "Loop container",
            ContainerKind::Parallel => "Parallel container",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ContainerKind::Loop => "#2FB3FF",
            ContainerKind::Parallel => "#FEE12B",
        }
    }
}

/// What a block type resolves to: a subflow container or a catalog block.
#[derive(Debug, Clone, Copy)]
pub enum BlockKind<'a> {
    Container(ContainerKind),
    Tool(&'a BlockSchema),
}

pub trait Catalog: Send + Sync {
    fn block(&self, block_type: &str) -> Option<&BlockSchema>;

    fn tool(&self, tool_id: &str) -> Option<&ToolSchema>;

    /// Classify a block type, failing on types that are neither containers
    /// nor known to the catalog.
    fn kind(&self, block_type: &str) -> SerializerResult<BlockKind<'_>> {
        if let Some(container) = ContainerKind::from_type(block_type) {
            return Ok(BlockKind::Container(container));
        }
        self.block(block_type)
            .map(BlockKind::Tool)
            .ok_or_else(|| SerializerError::UnknownBlockType(block_type.to_string()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryCatalog {
    #[serde(default)]
    pub blocks: HashMap<String, BlockSchema>,
    #[serde(default)]
    pub tools: HashMap<String, ToolSchema>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> SerializerResult<Self> {
        serde_json::from_str(json).map_err(|e| SerializerError::parse("catalog", e))
    }

    pub fn with_block(mut self, block_type: impl Into<String>, schema: BlockSchema) -> Self {
        self.blocks.insert(block_type.into(), schema);
        self
    }

    pub fn with_tool(mut self, tool_id: impl Into<String>, schema: ToolSchema) -> Self {
        self.tools.insert(tool_id.into(), schema);
        self
    }
}

impl Catalog for InMemoryCatalog {
    fn block(&self, block_type: &str) -> Option<&BlockSchema> {
        self.blocks.get(block_type)
    }

    fn tool(&self, tool_id: &str) -> Option<&ToolSchema> {
        self.tools.get(tool_id)
    }
}
