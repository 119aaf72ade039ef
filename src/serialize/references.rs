//! Best-effort check that `<block.path>` references stay within a block's
//! accessibility set.

use std::collections::HashMap;

use serde_json::Value;

use super::access::AccessibilityMap;
use crate::parse::types::{BlockMap, ParamMap};

/// Reference prefixes resolved by the executor rather than by block name.
const RESERVED_PREFIXES: &[&str] = &["loop", "parallel", "variable", "start"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeViolation {
    pub param: String,
    pub reference: String,
    pub target_id: String,
}

/// Block names as they appear in references: lower-cased, no whitespace.
pub fn normalize_block_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Map normalized block names to ids. Later duplicates are ignored.
pub fn block_name_index(blocks: &BlockMap) -> HashMap<String, String> {
    let mut index = HashMap::new();
    for block in blocks.values() {
        index
            .entry(normalize_block_name(&block.name))
            .or_insert_with(|| block.id.clone());
    }
    index
}

/// References in `params` that point at blocks `block_id` cannot access.
pub fn find_scope_violations(
    block_id: &str,
    params: &ParamMap,
    names: &HashMap<String, String>,
    access: &AccessibilityMap,
) -> Vec<ScopeViolation> {
    let mut violations = Vec::new();
    for (param, value) in params {
        let mut refs = Vec::new();
        collect_references(value, &mut refs);
        for reference in refs {
            let name = reference.split('.').next().unwrap_or_default();
            if RESERVED_PREFIXES.contains(&name) {
                continue;
            }
            let Some(target_id) = names.get(name) else {
                continue;
            };
            if !access.can_access(block_id, target_id) {
                violations.push(ScopeViolation {
                    param: param.clone(),
                    reference,
                    target_id: target_id.clone(),
                });
            }
        }
    }
    violations
}

fn collect_references(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.extend(references_in(s)),
        Value::Array(items) => items.iter().for_each(|v| collect_references(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_references(v, out)),
        _ => {}
    }
}

/// `<name.path>` spans with a word-character name and no whitespace.
fn references_in(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('<') {
        let after = &rest[open + 1..];
        let Some(close) = after.find(['>', '<']) else {
            break;
        };
        if after.as_bytes()[close] == b'>' {
            let inner = &after[..close];
            if is_reference(inner) {
                found.push(inner.to_lowercase());
            }
        }
        rest = &after[close..];
    }
    found
}

fn is_reference(inner: &str) -> bool {
    let Some((name, path)) = inner.split_once('.') else {
        return false;
    };
    !name.is_empty()
        && !path.is_empty()
        && name.chars().all(|c| c.is_alphanumeric() || c == '_')
        && !inner.chars().any(char::is_whitespace)
}
