//! Canonical parameter resolution.
//!
//! Several UI sub-fields (one basic, any number of advanced) can feed one
//! backend parameter. After collection only the value appropriate for the
//! block's mode survives, under the canonical id.

use serde_json::Value;

use crate::catalog::{SubBlockConfig, SubBlockMode};
use crate::parse::types::{ParamMap, is_unset};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalGroup {
    pub canonical_id: String,
    pub basic_id: Option<String>,
    pub advanced_ids: Vec<String>,
}

impl CanonicalGroup {
    fn new(canonical_id: &str) -> Self {
        CanonicalGroup {
            canonical_id: canonical_id.to_string(),
            basic_id: None,
            advanced_ids: Vec::new(),
        }
    }

    /// Every member field id, including a basic field that shares the
    /// canonical id.
    pub fn member_ids(&self) -> impl Iterator<Item = &str> {
        self.basic_id.iter().chain(self.advanced_ids.iter()).map(String::as_str)
    }

    /// Member keys that are replaced by the canonical key.
    pub fn source_ids(&self) -> impl Iterator<Item = &str> {
        self.member_ids().filter(|id| *id != self.canonical_id)
    }
}

/// Group sub-fields by canonical id, in declaration order.
pub fn canonical_groups(sub_blocks: &[SubBlockConfig]) -> Vec<CanonicalGroup> {
    let mut groups: Vec<CanonicalGroup> = Vec::new();

    for sub_block in sub_blocks {
        let Some(canonical_id) = sub_block.canonical_param_id.as_deref() else {
            continue;
        };
        let idx = match groups.iter().position(|g| g.canonical_id == canonical_id) {
            Some(idx) => idx,
            None => {
                groups.push(CanonicalGroup::new(canonical_id));
                groups.len() - 1
            }
        };
        let group = &mut groups[idx];

        if sub_block.mode == SubBlockMode::Advanced {
            if !group.advanced_ids.contains(&sub_block.id) {
                group.advanced_ids.push(sub_block.id.clone());
            }
        } else if group.basic_id.is_none() {
            group.basic_id = Some(sub_block.id.clone());
        }
    }

    groups
}

/// Collapse every group in `params` to a single canonical key.
///
/// Groups with no member key left in the bag are skipped, which makes a
/// second pass over an already resolved bag a no-op.
pub fn resolve_canonical_params(groups: &[CanonicalGroup], params: &mut ParamMap, advanced_mode: bool) {
    for group in groups {
        if group.source_ids().any(|id| params.contains_key(id)) {
            resolve_group(group, params, advanced_mode);
        }
    }
}

/// Resolve canonical groups for a block being serialized.
///
/// A group takes part when the block's UI state carries any of its member
/// fields, whatever their values, so an absent advanced field and a null one
/// resolve alike. Groups with source keys in the bag always take part.
pub fn resolve_block_canonical_params(
    groups: &[CanonicalGroup],
    params: &mut ParamMap,
    advanced_mode: bool,
    has_field: impl Fn(&str) -> bool,
) {
    for group in groups {
        if group.member_ids().any(&has_field) || group.source_ids().any(|id| params.contains_key(id)) {
            resolve_group(group, params, advanced_mode);
        }
    }
}

fn resolve_group(group: &CanonicalGroup, params: &mut ParamMap, advanced_mode: bool) {
    let basic = group
        .basic_id
        .as_deref()
        .and_then(|id| params.get(id))
        .filter(|v| !is_unset(Some(v)))
        .cloned();
    let advanced = group
        .advanced_ids
        .iter()
        .filter_map(|id| params.get(id))
        .find(|v| !is_unset(Some(v)))
        .cloned();

    let chosen = choose(basic, advanced, advanced_mode);

    let sources: Vec<String> = group.source_ids().map(str::to_string).collect();
    for id in sources {
        params.remove(&id);
    }

    match chosen {
        Some(value) => {
            params.insert(group.canonical_id.clone(), value);
        }
        None => {
            params.remove(&group.canonical_id);
        }
    }
}

fn choose(basic: Option<Value>, advanced: Option<Value>, advanced_mode: bool) -> Option<Value> {
    match (basic, advanced) {
        (Some(basic), Some(advanced)) => Some(if advanced_mode { advanced } else { basic }),
        (None, Some(advanced)) => Some(advanced),
        // A basic-only value is inactive while the block is in advanced mode.
        (Some(basic), None) => (!advanced_mode).then_some(basic),
        (None, None) => None,
    }
}
