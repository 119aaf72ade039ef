pub mod catalog;
pub mod error;
pub mod ir;
pub mod parse;
pub mod serialize;
pub mod validate;
pub mod wasm;

pub use error::{SerializerError, SerializerResult, WorkflowValidationError};
pub use serialize::{SerializeOptions, Serializer};
