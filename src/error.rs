//! Error types shared by the serializer, deserializer and validator.

use thiserror::Error;

/// Result type for serializer operations.
pub type SerializerResult<T> = Result<T, SerializerError>;

/// Pre-execution validation failure attributed to a single block.
///
/// Raised by the required-field check and the collection check. Callers are
/// expected to surface `message` to the user and re-invoke after the
/// workflow has been edited.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] {message}")]
pub struct WorkflowValidationError {
    pub code: &'static str,
    pub message: String,
    pub block_id: String,
    pub block_type: String,
    pub block_name: String,
}

impl WorkflowValidationError {
    pub fn new(
        code: &'static str,
        message: impl Into<String>,
        block_id: impl Into<String>,
        block_type: impl Into<String>,
        block_name: impl Into<String>,
    ) -> Self {
        WorkflowValidationError {
            code,
            message: message.into(),
            block_id: block_id.into(),
            block_type: block_type.into(),
            block_name: block_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SerializerError {
    /// The block type is not a container and the catalog has no schema for it.
    #[error("Invalid block type: {0}")]
    UnknownBlockType(String),

    /// An edge or container references a block that is not in the workflow.
    #[error("{owner} references unknown block '{block_id}'")]
    DanglingReference { owner: String, block_id: String },

    /// Input JSON could not be deserialized.
    #[error("Failed to parse {what} JSON: {message}")]
    Parse { what: &'static str, message: String },

    #[error(transparent)]
    Validation(#[from] WorkflowValidationError),
}

impl SerializerError {
    pub fn parse(what: &'static str, err: impl std::fmt::Display) -> Self {
        SerializerError::Parse {
            what,
            message: err.to_string(),
        }
    }

    /// Block attribution for validation failures; `None` for structural errors.
    pub fn validation(&self) -> Option<&WorkflowValidationError> {
        match self {
            SerializerError::Validation(e) => Some(e),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            SerializerError::UnknownBlockType(_) => "S001",
            SerializerError::DanglingReference { .. } => "S002",
            SerializerError::Parse { .. } => "P001",
            SerializerError::Validation(e) => e.code,
        }
    }
}
