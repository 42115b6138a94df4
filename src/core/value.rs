//! Dynamic variable values and their type discriminant

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A caller-supplied (or merged) set of named variables.
///
/// Insertion order is preserved so that merged sets keep declaration order.
pub type VariableSet = Map<String, Value>;

/// The type a variable can be declared with in the metadata block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    #[default]
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl VariableType {
    /// Classify a dynamic value.
    ///
    /// Sequences are checked first. `null` is treated as absent and has no type.
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Array(_) => Some(Self::Array),
            Value::String(_) => Some(Self::String),
            Value::Number(_) => Some(Self::Number),
            Value::Bool(_) => Some(Self::Boolean),
            Value::Object(_) => Some(Self::Object),
            Value::Null => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Look up a variable, treating `null` the same as a missing key
pub fn present<'a>(vars: &'a VariableSet, name: &str) -> Option<&'a Value> {
    vars.get(name).filter(|v| !v.is_null())
}

/// Format a number the way it reads in a template: integral values have no fraction
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Render a value for human-facing messages (strings unquoted)
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_f64().map(format_number).unwrap_or_else(|| n.to_string()),
        other => other.to_string(),
    }
}

/// Equality used for `enum` membership: numbers compare by numeric value
pub fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}
