//! WASM entry points for browser use.
//!
//! Every entry point takes JSON strings and returns a plain JS object with
//! `status: "success"` and a payload, or `status: "errors"` and a list of
//! error DTOs. Catalogs passed from JS are declarative only, so computed
//! defaults and custom tool selectors are unavailable here.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::catalog::InMemoryCatalog;
use crate::error::{SerializerError, SerializerResult};
use crate::ir::SerializedWorkflow;
use crate::parse::{self, WorkflowState};
use crate::serialize::{SerializeOptions, Serializer};

/// Serialize an editor workflow state JSON against a catalog JSON.
#[wasm_bindgen]
pub fn serialize_workflow(state_json: &str, catalog_json: &str, validate_required: bool) -> JsValue {
    to_js(&serialize_workflow_inner(state_json, catalog_json, validate_required))
}

fn serialize_workflow_inner(
    state_json: &str,
    catalog_json: &str,
    validate_required: bool,
) -> WasmResult<SerializedWorkflow> {
    let run = || -> SerializerResult<SerializedWorkflow> {
        let state = parse::parse_workflow_state(state_json)?;
        let catalog = InMemoryCatalog::from_json(catalog_json)?;
        let options = SerializeOptions { validate_required };
        Serializer::new(&catalog).serialize_state(&state, options)
    };
    WasmResult::from(run())
}

/// Rebuild editor state from a serialized workflow JSON.
#[wasm_bindgen]
pub fn deserialize_workflow(ir_json: &str, catalog_json: &str) -> JsValue {
    to_js(&deserialize_workflow_inner(ir_json, catalog_json))
}

fn deserialize_workflow_inner(ir_json: &str, catalog_json: &str) -> WasmResult<WorkflowState> {
    let run = || -> SerializerResult<WorkflowState> {
        let ir = parse::parse_serialized_workflow(ir_json)?;
        let catalog = InMemoryCatalog::from_json(catalog_json)?;
        Serializer::new(&catalog).deserialize_workflow(&ir)
    };
    WasmResult::from(run())
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: String,
    message: String,
    block_id: Option<String>,
    block_type: Option<String>,
    block_name: Option<String>,
}

impl From<SerializerError> for ErrorDto {
    fn from(e: SerializerError) -> Self {
        let attribution = e.validation().cloned();
        ErrorDto {
            code: e.code().to_string(),
            message: match &attribution {
                Some(v) => v.message.clone(),
                None => e.to_string(),
            },
            block_id: attribution.as_ref().map(|v| v.block_id.clone()),
            block_type: attribution.as_ref().map(|v| v.block_type.clone()),
            block_name: attribution.map(|v| v.block_name),
        }
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(tag = "status")]
enum WasmResult<T> {
    #[serde(rename = "success")]
    Success { result: T },
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}

impl<T> From<Result<T, SerializerError>> for WasmResult<T> {
    fn from(result: Result<T, SerializerError>) -> Self {
        match result {
            Ok(result) => WasmResult::Success { result },
            Err(e) => WasmResult::Errors {
                errors: vec![ErrorDto::from(e)],
            },
        }
    }
}
