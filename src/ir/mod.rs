//! Intermediate representation produced by serialization.

pub mod types;

pub use types::*;
