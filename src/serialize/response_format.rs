//! Safe parsing of a block's `responseFormat` parameter.

use serde_json::Value;
use thiserror::Error;

const TRACING_TARGET: &str = "workflow_serializer::response_format";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("response format is not valid JSON: {0}")]
pub struct ResponseFormatError(pub String);

/// Interpret a raw `responseFormat` value.
///
/// Objects and arrays pass through, `<...>` strings are runtime references
/// and pass through verbatim, other strings must be JSON. Empty input yields
/// `Ok(None)`.
pub fn try_parse_response_format(raw: &Value) -> Result<Option<Value>, ResponseFormatError> {
    match raw {
        Value::Object(_) | Value::Array(_) => Ok(Some(raw.clone())),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            if trimmed.starts_with('<') && trimmed.contains('>') {
                return Ok(Some(Value::String(trimmed.to_string())));
            }
            serde_json::from_str(trimmed)
                .map(Some)
                .map_err(|e| ResponseFormatError(e.to_string()))
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => Ok(None),
    }
}

/// Like [`try_parse_response_format`], but malformed input is logged and
/// treated as absent.
pub fn parse_response_format_safely(raw: &Value) -> Option<Value> {
    try_parse_response_format(raw).unwrap_or_else(|err| {
        tracing::warn!(
            target: TRACING_TARGET,
            value = %raw,
            error = %err,
            "Failed to parse response format, ignoring it"
        );
        None
    })
}
