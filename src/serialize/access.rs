//! Per-block accessibility sets.
//!
//! A block may reference the outputs of itself, its graph ancestors, the
//! start block, and every block sharing a loop or parallel with it.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::parse::graph::WorkflowGraph;
use crate::parse::types::{BlockMap, Edge, Loop, Parallel};

/// Block types that act as the workflow entry point.
pub const START_BLOCK_TYPES: &[&str] = &["starter", "start_trigger"];

pub fn is_start_block_type(block_type: &str) -> bool {
    START_BLOCK_TYPES.contains(&block_type)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessibilityMap {
    sets: HashMap<String, HashSet<String>>,
}

impl AccessibilityMap {
    pub fn accessible(&self, block_id: &str) -> Option<&HashSet<String>> {
        self.sets.get(block_id)
    }

    pub fn can_access(&self, from: &str, to: &str) -> bool {
        self.sets.get(from).is_some_and(|s| s.contains(to))
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

pub fn build_accessibility_map(
    blocks: &BlockMap,
    edges: &[Edge],
    loops: &BTreeMap<String, Loop>,
    parallels: &BTreeMap<String, Parallel>,
) -> AccessibilityMap {
    let graph = WorkflowGraph::build(edges);
    let start_id = blocks
        .values()
        .find(|b| is_start_block_type(&b.block_type))
        .map(|b| b.id.clone());

    let subflow_members = loops
        .values()
        .map(|l| &l.nodes)
        .chain(parallels.values().map(|p| &p.nodes));

    let mut sets: HashMap<String, HashSet<String>> = blocks
        .keys()
        .map(|id| {
            let mut set = graph.ancestors(id);
            set.insert(id.clone());
            if let Some(start) = &start_id {
                set.insert(start.clone());
            }
            (id.clone(), set)
        })
        .collect();

    // Subflow order is container-internal, so co-members see each other
    // regardless of edge direction.
    for members in subflow_members {
        for member in members {
            if let Some(set) = sets.get_mut(member) {
                set.extend(members.iter().cloned());
            }
        }
    }

    AccessibilityMap { sets }
}
