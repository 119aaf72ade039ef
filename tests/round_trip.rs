//! End-to-end tests: editor JSON → IR → editor state.

#[allow(dead_code)]
mod helpers;

use std::collections::{BTreeMap, HashSet};

use helpers::*;
use serde_json::json;
use workflow_serializer::ir::WORKFLOW_VERSION;
use workflow_serializer::parse::{self, WorkflowState};
use workflow_serializer::serialize::build_accessibility_map;
use workflow_serializer::{SerializeOptions, Serializer};

fn fixture() -> WorkflowState {
    parse::parse_workflow_state(include_str!("fixtures/support_triage.json")).expect("Should parse")
}

#[test]
fn fixture_serializes_with_validation() {
    let catalog = test_catalog();
    let ir = Serializer::new(&catalog)
        .serialize_state(&fixture(), SerializeOptions::validated())
        .expect("Should serialize");

    assert_eq!(ir.version, WORKFLOW_VERSION);
    let ids: Vec<&str> = ir.blocks.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, ["start", "classify", "each", "notify"]);

    let classify = ir.block("classify").unwrap();
    assert_eq!(classify.config.tool, "openai_chat");
    assert_eq!(classify.config.params["model"], json!("gpt-4"));
    assert_eq!(classify.config.params["temperature"], json!(0.7));
    assert_eq!(classify.inputs.len(), 1);
    assert_eq!(classify.outputs["content"], json!("string"));

    let each = ir.block("each").unwrap();
    assert_eq!(each.config.params["collection"], json!("<classifyticket.tags>"));
    assert_eq!(ir.loops["each"].nodes, ["notify"]);
    assert_eq!(ir.parallels, Some(BTreeMap::new()));

    insta::assert_json_snapshot!(ir.connections, @r#"
    [
      {
        "source": "start",
        "target": "classify"
      },
      {
        "source": "classify",
        "target": "each",
        "sourceHandle": "source"
      },
      {
        "source": "each",
        "target": "notify",
        "sourceHandle": "loop-start-source"
      }
    ]
    "#);
}

#[test]
fn deserialize_restores_blocks_and_edges() {
    let catalog = test_catalog();
    let serializer = Serializer::new(&catalog);
    let original = fixture();
    let ir = serializer
        .serialize_state(&original, SerializeOptions::default())
        .expect("Should serialize");
    let restored = serializer.deserialize_workflow(&ir).expect("Should deserialize");

    assert_eq!(
        restored.blocks.keys().collect::<Vec<_>>(),
        original.blocks.keys().collect::<Vec<_>>()
    );
    for (id, block) in &restored.blocks {
        assert_eq!(block.block_type, original.blocks[id].block_type, "type of {id}");
        assert_eq!(block.name, original.blocks[id].name, "name of {id}");
        assert_eq!(block.position, original.blocks[id].position, "position of {id}");
    }

    let notify = &restored.blocks["notify"];
    assert_eq!(notify.sub_block_value("to"), Some(&json!("team@example.com")));
    assert_eq!(notify.sub_block_value("subject"), Some(&json!("<loop.currentItem>")));
    assert_eq!(notify.sub_block_value("folder"), None);
    assert_eq!(notify.trigger_mode, None);
    assert_eq!(notify.advanced_mode, None);

    let each = &restored.blocks["each"];
    assert_eq!(each.data, original.blocks["each"].data);
    assert_eq!(restored.loops, original.loops);

    assert_eq!(restored.edges.len(), 3);
    let edge_ids: HashSet<&str> = restored.edges.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(edge_ids.len(), 3, "Edge ids should be unique");
    assert!(!edge_ids.contains("e1"), "Edge ids should be regenerated");
    assert_eq!(restored.edges[1].source_handle.as_deref(), Some("source"));
    assert_eq!(restored.edges[2].target_handle, None);
}

#[test]
fn reserialized_params_match() {
    let catalog = test_catalog();
    let serializer = Serializer::new(&catalog);
    let first = serializer
        .serialize_state(&fixture(), SerializeOptions::default())
        .expect("Should serialize");
    let restored = serializer.deserialize_workflow(&first).expect("Should deserialize");
    let second = serializer
        .serialize_state(&restored, SerializeOptions::default())
        .expect("Should serialize again");

    for id in ["notify", "start", "each"] {
        let before = &first.block(id).unwrap().config;
        let after = &second.block(id).unwrap().config;
        assert_eq!(before.tool, after.tool, "tool of {id}");
        for (key, value) in &before.params {
            assert_eq!(after.params.get(key), Some(value), "param {key} of {id}");
        }
    }
    assert_eq!(first.connections, second.connections);
}

#[test]
fn trigger_and_advanced_modes_survive_round_trip() {
    let catalog = test_catalog();
    let serializer = Serializer::new(&catalog);
    let state = WorkflowState {
        blocks: blocks(vec![
            block("w1", "webhook", "Webhook", &[("path", json!("/in"))]),
            advanced(block("a1", "agent", "Agent", &[("modelAdvanced", json!("custom-llm"))])),
        ]),
        edges: vec![edge("w1", "a1")],
        ..Default::default()
    };
    let ir = serializer
        .serialize_state(&state, SerializeOptions::default())
        .expect("Should serialize");
    let restored = serializer.deserialize_workflow(&ir).expect("Should deserialize");

    assert_eq!(restored.blocks["w1"].trigger_mode, Some(true));
    assert_eq!(restored.blocks["w1"].sub_block_value("path"), Some(&json!("/in")));
    assert_eq!(restored.blocks["a1"].advanced_mode, Some(true));
    assert_eq!(restored.blocks["a1"].trigger_mode, None);
}

#[test]
fn blocks_keep_editor_order() {
    let catalog = test_catalog();
    let serializer = Serializer::new(&catalog);
    let state = WorkflowState {
        blocks: blocks(vec![
            block("zeta", "api", "Zeta", &[]),
            block("alpha", "api", "Alpha", &[]),
            block("mid", "api", "Mid", &[]),
        ]),
        ..Default::default()
    };
    let ir = serializer
        .serialize_state(&state, SerializeOptions::default())
        .expect("Should serialize");
    let ids: Vec<&str> = ir.blocks.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, ["zeta", "alpha", "mid"]);

    let restored = serializer.deserialize_workflow(&ir).expect("Should deserialize");
    let restored_ids: Vec<&str> = restored.blocks.keys().map(String::as_str).collect();
    assert_eq!(restored_ids, ["zeta", "alpha", "mid"]);
}

#[test]
fn unknown_version_still_deserializes() {
    let catalog = test_catalog();
    let serializer = Serializer::new(&catalog);
    let mut ir = serializer
        .serialize_state(&fixture(), SerializeOptions::default())
        .expect("Should serialize");
    ir.version = "0.9".into();
    assert!(serializer.deserialize_workflow(&ir).is_ok());
}

#[test]
fn persisted_json_round_trips() {
    let catalog = test_catalog();
    let ir = Serializer::new(&catalog)
        .serialize_state(&fixture(), SerializeOptions::default())
        .expect("Should serialize");
    let json = serde_json::to_string(&ir).unwrap();
    let parsed = parse::parse_serialized_workflow(&json).expect("Should parse IR");
    assert_eq!(parsed, ir);
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = parse::parse_workflow_state("{ \"blocks\": ").unwrap_err();
    assert_eq!(err.code(), "P001");
    let err = parse::parse_serialized_workflow("[]").unwrap_err();
    assert_eq!(err.code(), "P001");
}

#[test]
fn loop_members_share_scope_with_start_and_ancestors() {
    let state = WorkflowState {
        blocks: blocks(vec![
            block("s", "starter", "Start", &[]),
            block("a", "api", "Before", &[]),
            container("loop1", "loop", "Loop", json!({})),
            block("p", "api", "P", &[]),
            block("l", "api", "L", &[]),
            block("q", "api", "Q", &[]),
            block("z", "api", "Outside", &[]),
        ]),
        edges: vec![edge("a", "l"), edge("p", "q")],
        loops: loops(vec![for_each_loop("loop1", &["p", "l", "q"], Some(json!([1])))]),
        ..Default::default()
    };
    let map = build_accessibility_map(&state.blocks, &state.edges, &state.loops, &state.parallels);

    let l = map.accessible("l").unwrap();
    for id in ["l", "p", "q", "s", "a"] {
        assert!(l.contains(id), "l should see {id}: {:?}", l);
    }
    assert!(!l.contains("z"));
    assert!(!l.contains("loop1"));
    assert!(map.can_access("p", "l"), "Co-members see each other regardless of edges");
    assert!(!map.can_access("a", "l"));
    assert_eq!(map.len(), state.blocks.len());
}
