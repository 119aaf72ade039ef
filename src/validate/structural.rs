//! Referential integrity of edges and subflow registries (S002).

use std::collections::BTreeMap;

use crate::error::{SerializerError, SerializerResult};
use crate::parse::types::{BlockMap, Edge, Loop, Parallel};

/// Every edge endpoint, container id and container member must be a block
/// of the workflow.
pub fn validate_structural(
    blocks: &BlockMap,
    edges: &[Edge],
    loops: &BTreeMap<String, Loop>,
    parallels: &BTreeMap<String, Parallel>,
) -> SerializerResult<()> {
    for edge in edges {
        for endpoint in [&edge.source, &edge.target] {
            check_exists(blocks, format!("Edge '{}'", edge.id), endpoint)?;
        }
    }

    let containers = loops
        .values()
        .map(|l| ("Loop", &l.id, &l.nodes))
        .chain(parallels.values().map(|p| ("Parallel", &p.id, &p.nodes)));
    for (label, id, nodes) in containers {
        check_exists(blocks, format!("{label} '{id}'"), id)?;
        for member in nodes {
            check_exists(blocks, format!("{label} '{id}'"), member)?;
        }
    }

    Ok(())
}

fn check_exists(blocks: &BlockMap, owner: String, id: &str) -> SerializerResult<()> {
    if blocks.contains_key(id) {
        Ok(())
    } else {
        Err(SerializerError::DanglingReference {
            owner,
            block_id: id.to_string(),
        })
    }
}
