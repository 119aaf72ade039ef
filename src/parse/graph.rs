//! petgraph-based directed graph over the workflow edge list.
//!
//! Backs the ancestor lookup used by the accessibility map. Only block ids
//! and edge direction matter here; handles are ignored.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Bfs, Reversed};

use super::types::Edge;

pub struct WorkflowGraph {
    pub graph: DiGraph<String, ()>,
    pub node_indices: HashMap<String, NodeIndex>,
}

impl WorkflowGraph {
    /// Build the graph from an edge list. Every endpoint becomes a node.
    pub fn build(edges: &[Edge]) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices: HashMap<String, NodeIndex> = HashMap::new();

        for edge in edges {
            let s = *node_indices
                .entry(edge.source.clone())
                .or_insert_with(|| graph.add_node(edge.source.clone()));
            let t = *node_indices
                .entry(edge.target.clone())
                .or_insert_with(|| graph.add_node(edge.target.clone()));
            graph.add_edge(s, t, ());
        }

        WorkflowGraph { graph, node_indices }
    }

    /// All blocks with a directed path into `block_id`. The block itself is
    /// never included, even when it sits on a cycle.
    pub fn ancestors(&self, block_id: &str) -> HashSet<String> {
        let Some(&start) = self.node_indices.get(block_id) else {
            return HashSet::new();
        };

        let reversed = Reversed(&self.graph);
        let mut bfs = Bfs::new(reversed, start);
        let mut found = HashSet::new();
        while let Some(nx) = bfs.next(reversed) {
            if nx != start {
                found.insert(self.graph[nx].clone());
            }
        }
        found
    }
}
