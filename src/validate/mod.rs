//! Pre-execution validation.
//!
//! Structural checks always run during serialization. The collection check
//! and the required-field check only run when validation is requested, and
//! both see parameters after extraction and canonical resolution.

pub mod collection;
pub mod required;
pub mod structural;

pub use collection::{has_non_empty_collection, validate_subflow_collections};
pub use required::validate_required_fields;
pub use structural::validate_structural;
