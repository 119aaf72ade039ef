//! Non-empty collection check for `forEach` loops and `collection`
//! parallels (C001, C002).

use std::collections::BTreeMap;

use serde_json::Value;

use crate::catalog::ContainerKind;
use crate::error::WorkflowValidationError;
use crate::parse::types::{BlockMap, Loop, LoopType, Parallel, ParallelType};

/// Container data key the editor also uses for the collection source.
const DATA_COLLECTION_KEY: &str = "collection";

pub fn validate_subflow_collections(
    blocks: &BlockMap,
    loops: &BTreeMap<String, Loop>,
    parallels: &BTreeMap<String, Parallel>,
) -> Result<(), WorkflowValidationError> {
    for lp in loops.values() {
        if lp.loop_type != LoopType::ForEach {
            continue;
        }
        let source = lp
            .for_each_items
            .as_ref()
            .or_else(|| container_collection(blocks, &lp.id));
        if !has_non_empty_collection(source) {
            return Err(collection_error("C001", ContainerKind::Loop, &lp.id, blocks, "forEach"));
        }
    }

    for parallel in parallels.values() {
        if parallel.parallel_type != Some(ParallelType::Collection) {
            continue;
        }
        let source = parallel
            .distribution
            .as_ref()
            .or_else(|| container_collection(blocks, &parallel.id));
        if !has_non_empty_collection(source) {
            return Err(collection_error(
                "C002",
                ContainerKind::Parallel,
                &parallel.id,
                blocks,
                "distribution",
            ));
        }
    }

    Ok(())
}

/// Whether `source` plausibly yields at least one item.
///
/// Strings that look like JSON must parse to a non-empty array or object;
/// strings that fail to parse are accepted as runtime expressions.
pub fn has_non_empty_collection(source: Option<&Value>) -> bool {
    match source {
        None | Some(Value::Null) => false,
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return false;
            }
            if trimmed.starts_with('[') || trimmed.starts_with('{') {
                return match serde_json::from_str::<Value>(trimmed) {
                    Ok(Value::Array(items)) => !items.is_empty(),
                    Ok(Value::Object(map)) => !map.is_empty(),
                    Ok(_) | Err(_) => true,
                };
            }
            true
        }
        Some(Value::Bool(_) | Value::Number(_)) => false,
    }
}

fn container_collection<'a>(blocks: &'a BlockMap, id: &str) -> Option<&'a Value> {
    blocks
        .get(id)
        .and_then(|b| b.data.as_ref())
        .and_then(|d| d.get(DATA_COLLECTION_KEY))
}

fn collection_error(
    code: &'static str,
    kind: ContainerKind,
    id: &str,
    blocks: &BlockMap,
    what: &str,
) -> WorkflowValidationError {
    let name = blocks
        .get(id)
        .map(|b| b.name.as_str())
        .filter(|n| !n.is_empty())
        .unwrap_or(kind.display_name());
    WorkflowValidationError::new(
        code,
        format!(
            "{} requires a collection for {}. Provide a non-empty array/object or a variable reference.",
            name, what
        ),
        id,
        kind.type_id(),
        name,
    )
}
