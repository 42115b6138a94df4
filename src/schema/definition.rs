//! Variable schema - definitions read from a template's metadata block

use miette::Diagnostic;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::core::value::{VariableSet, VariableType};

/// Errors raised while reading a variable schema
#[derive(Debug, Error, Diagnostic)]
pub enum SchemaError {
    #[error("Variable '{variable}' has an invalid definition: {message}")]
    #[diagnostic(code(playt::schema::definition))]
    Definition { variable: String, message: String },

    #[error("Variable '{variable}' has an invalid pattern: {pattern}")]
    #[diagnostic(
        code(playt::schema::pattern),
        help("Patterns use Rust regex syntax; lookaround and backreferences are not supported")
    )]
    InvalidPattern {
        variable: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Constraints applied to a correctly typed value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<Value>>,

    #[serde(rename = "minLength", default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    #[serde(rename = "maxLength", default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    #[serde(skip)]
    compiled_pattern: Option<Regex>,
}

impl ValidationRules {
    /// The precompiled `pattern`, if one was declared
    pub fn pattern_regex(&self) -> Option<&Regex> {
        self.compiled_pattern.as_ref()
    }

    fn compile(&mut self, variable: &str) -> Result<(), SchemaError> {
        if let Some(ref pattern) = self.pattern {
            let regex = Regex::new(pattern).map_err(|source| SchemaError::InvalidPattern {
                variable: variable.to_string(),
                pattern: pattern.clone(),
                source,
            })?;
            self.compiled_pattern = Some(regex);
        }
        Ok(())
    }
}

/// Declaration of a single template variable
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariableDefinition {
    /// Declared type; `string` when absent
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<VariableType>,

    #[serde(default, deserialize_with = "null_as_false")]
    pub required: bool,

    /// `Some(Value::Null)` for an explicit `default: null`
    #[serde(
        default,
        deserialize_with = "keep_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,
}

impl VariableDefinition {
    /// The effective type of the variable
    pub fn var_type(&self) -> VariableType {
        self.declared_type.unwrap_or_default()
    }

    /// Builder-style constructor used mostly by tests and embedders
    pub fn of_type(var_type: VariableType) -> Self {
        Self {
            declared_type: Some(var_type),
            ..Default::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with_rules(mut self, rules: ValidationRules) -> Self {
        self.validation = Some(rules);
        self
    }
}

/// The declared variables of a template, in declaration order.
///
/// Built once per document and never modified afterwards.
#[derive(Debug, Clone, Default)]
pub struct VariableSchema {
    variables: Vec<(String, VariableDefinition)>,
}

impl VariableSchema {
    /// Build a schema from definitions, compiling any patterns.
    ///
    /// A later definition with the same name replaces the earlier one in place.
    pub fn new(
        definitions: impl IntoIterator<Item = (String, VariableDefinition)>,
    ) -> Result<Self, SchemaError> {
        let mut variables: Vec<(String, VariableDefinition)> = Vec::new();

        for (name, mut def) in definitions {
            if let Some(ref mut rules) = def.validation {
                rules.compile(&name)?;
            }
            warn_on_default_mismatch(&name, &def);

            match variables.iter_mut().find(|(existing, _)| *existing == name) {
                Some(slot) => slot.1 = def,
                None => variables.push((name, def)),
            }
        }

        Ok(Self { variables })
    }

    /// Read the `variables` mapping of a parsed metadata block.
    ///
    /// A missing or `null` mapping yields an empty schema; a `null`
    /// definition is an empty definition (optional string).
    pub fn from_metadata(metadata: &Value) -> Result<Self, SchemaError> {
        let entries = match metadata.get("variables") {
            None | Some(Value::Null) => return Ok(Self::default()),
            Some(Value::Object(entries)) => entries,
            Some(other) => {
                return Err(SchemaError::Definition {
                    variable: "variables".to_string(),
                    message: format!("expected a mapping of variable names, got {}", other),
                })
            }
        };

        let mut definitions = Vec::with_capacity(entries.len());
        for (name, raw) in entries {
            let def = if raw.is_null() {
                VariableDefinition::default()
            } else {
                serde_json::from_value::<VariableDefinition>(raw.clone()).map_err(|e| {
                    SchemaError::Definition {
                        variable: name.clone(),
                        message: e.to_string(),
                    }
                })?
            };
            definitions.push((name.clone(), def));
        }

        let schema = Self::new(definitions)?;
        tracing::debug!(variables = schema.len(), "read variable schema");
        Ok(schema)
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn get(&self, name: &str) -> Option<&VariableDefinition> {
        self.variables.iter().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    /// Definitions in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VariableDefinition)> {
        self.variables.iter().map(|(n, d)| (n.as_str(), d))
    }

    /// Declared defaults, in declaration order
    pub fn defaults(&self) -> VariableSet {
        self.iter()
            .filter_map(|(name, def)| def.default.clone().map(|v| (name.to_string(), v)))
            .collect()
    }
}

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

fn keep_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Defaults are merged as-is; a mismatch is only worth a warning
fn warn_on_default_mismatch(name: &str, def: &VariableDefinition) {
    if let Some(actual) = def.default.as_ref().and_then(VariableType::of) {
        if actual != def.var_type() {
            tracing::warn!(
                variable = name,
                declared = %def.var_type(),
                default_type = %actual,
                "default value does not match declared type"
            );
        }
    }
}
