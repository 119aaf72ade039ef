//! Sub-field visibility conditions.
//!
//! A condition compares one parameter against a value or a value set, may be
//! negated, and may be AND-ed with one further comparison. Conditions are
//! plain data so schemas can be loaded from JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::parse::types::ParamMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldCondition {
    pub field: String,
    /// A single value, or an array meaning "any of".
    pub value: Value,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub not: bool,
}

impl FieldCondition {
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        FieldCondition {
            field: field.into(),
            value: value.into(),
            not: false,
        }
    }

    pub fn not_equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        FieldCondition {
            not: true,
            ..FieldCondition::equals(field, value)
        }
    }

    pub fn evaluate(&self, params: &ParamMap) -> bool {
        let actual = params.get(&self.field).unwrap_or(&Value::Null);
        let matched = match &self.value {
            Value::Array(options) => options.contains(actual),
            expected => expected == actual,
        };
        matched != self.not
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityCondition {
    #[serde(flatten)]
    pub when: FieldCondition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub and: Option<FieldCondition>,
}

impl VisibilityCondition {
    pub fn new(when: FieldCondition) -> Self {
        VisibilityCondition { when, and: None }
    }

    pub fn and(mut self, other: FieldCondition) -> Self {
        self.and = Some(other);
        self
    }

    pub fn evaluate(&self, params: &ParamMap) -> bool {
        self.when.evaluate(params) && self.and.as_ref().is_none_or(|c| c.evaluate(params))
    }
}
