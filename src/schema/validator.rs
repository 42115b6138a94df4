//! Variable validation against a template's declared schema
//!
//! Validation never fails fast: every variable is checked and every
//! violation is collected, in declaration order.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::core::value::{display_value, format_number, loosely_equal, present, VariableSet, VariableType};
use crate::schema::definition::{ValidationRules, VariableSchema};

/// Category of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// A required variable was not supplied
    MissingRequiredVariable,
    /// The value's type differs from the declared type
    InvalidType,
    /// A correctly typed value broke one of its rules
    ValidationError,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MissingRequiredVariable => "MissingRequiredVariable",
            Self::InvalidType => "InvalidType",
            Self::ValidationError => "ValidationError",
        };
        f.write_str(s)
    }
}

/// A single problem with a supplied variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub variable: String,
    #[serde(rename = "error")]
    pub kind: ValidationErrorKind,
    pub message: String,
}

impl ValidationError {
    fn new(variable: &str, kind: ValidationErrorKind, message: String) -> Self {
        Self {
            variable: variable.to_string(),
            kind,
            message,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of validating a variable set; `valid` is true exactly when `errors` is empty
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    valid: bool,
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self::from_errors(Vec::new())
    }

    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

/// Check `supplied` against `schema`.
///
/// An empty schema accepts anything.
pub fn validate(schema: &VariableSchema, supplied: &VariableSet) -> ValidationResult {
    if schema.is_empty() {
        return ValidationResult::success();
    }

    let mut errors = Vec::new();

    for (name, def) in schema.iter() {
        let Some(value) = present(supplied, name) else {
            if def.required {
                errors.push(ValidationError::new(
                    name,
                    ValidationErrorKind::MissingRequiredVariable,
                    format!("Variable '{}' is required but was not provided", name),
                ));
            }
            continue;
        };

        let expected = def.var_type();
        let Some(actual) = VariableType::of(value) else {
            continue;
        };
        if expected != actual {
            errors.push(ValidationError::new(
                name,
                ValidationErrorKind::InvalidType,
                format!(
                    "Variable '{}' expected type '{}' but got '{}'",
                    name, expected, actual
                ),
            ));
            continue;
        }

        if let Some(ref rules) = def.validation {
            for problem in check_rules(value, rules) {
                errors.push(ValidationError::new(
                    name,
                    ValidationErrorKind::ValidationError,
                    format!("Variable '{}': {}", name, problem),
                ));
            }
        }
    }

    tracing::debug!(checked = schema.len(), errors = errors.len(), "validated variables");
    ValidationResult::from_errors(errors)
}

/// Apply custom rules to a value whose type already matched
fn check_rules(value: &Value, rules: &ValidationRules) -> Vec<String> {
    let mut problems = Vec::new();

    if let Value::String(s) = value {
        let length = s.chars().count();
        if let Some(min) = rules.min_length {
            if length < min {
                problems.push(format!("Minimum length is {}, but got {}", min, length));
            }
        }
        if let Some(max) = rules.max_length {
            if length > max {
                problems.push(format!("Maximum length is {}, but got {}", max, length));
            }
        }
        if let (Some(regex), Some(pattern)) = (rules.pattern_regex(), rules.pattern.as_deref()) {
            if !regex.is_match(s) {
                problems.push(format!("Value does not match pattern: {}", pattern));
            }
        }
    }

    if let Some(n) = value.as_f64() {
        if let Some(min) = rules.min {
            if n < min {
                problems.push(format!(
                    "Minimum value is {}, but got {}",
                    format_number(min),
                    format_number(n)
                ));
            }
        }
        if let Some(max) = rules.max {
            if n > max {
                problems.push(format!(
                    "Maximum value is {}, but got {}",
                    format_number(max),
                    format_number(n)
                ));
            }
        }
    }

    if let Some(ref allowed) = rules.allowed {
        if !allowed.iter().any(|candidate| loosely_equal(candidate, value)) {
            let options = allowed.iter().map(display_value).collect::<Vec<_>>().join(", ");
            problems.push(format!("Value must be one of: {}", options));
        }
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::definition::VariableDefinition;
    use serde_json::json;

    fn schema(metadata: Value) -> VariableSchema {
        VariableSchema::from_metadata(&metadata).unwrap()
    }

    fn vars(value: Value) -> VariableSet {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn code_review_schema() -> VariableSchema {
        schema(json!({
            "variables": {
                "language": {
                    "type": "string",
                    "required": true,
                    "validation": {"enum": ["typescript", "python", "javascript"]}
                },
                "code": {
                    "type": "string",
                    "required": true,
                    "validation": {"minLength": 10, "maxLength": 10000}
                },
                "focus": {"type": "string", "default": "general"}
            }
        }))
    }

    #[test]
    fn test_empty_schema_accepts_anything() {
        let empty = VariableSchema::default();
        assert!(validate(&empty, &VariableSet::new()).is_valid());
        assert!(validate(&empty, &vars(json!({"x": [1], "y": {"z": null}}))).is_valid());
    }

    #[test]
    fn test_missing_required_in_declaration_order() {
        let result = validate(&code_review_schema(), &VariableSet::new());
        assert!(!result.is_valid());
        assert_eq!(result.errors().len(), 2);
        assert_eq!(result.errors()[0].variable, "language");
        assert_eq!(result.errors()[1].variable, "code");
        for err in result.errors() {
            assert_eq!(err.kind, ValidationErrorKind::MissingRequiredVariable);
        }
        assert_eq!(
            result.errors()[0].message,
            "Variable 'language' is required but was not provided"
        );
    }

    #[test]
    fn test_null_counts_as_missing() {
        let result = validate(
            &code_review_schema(),
            &vars(json!({"language": null, "code": "fn main() { }"})),
        );
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].kind, ValidationErrorKind::MissingRequiredVariable);
    }

    #[test]
    fn test_type_mismatch_skips_rules() {
        let result = validate(
            &code_review_schema(),
            &vars(json!({"language": 123, "code": "print('hello world')"})),
        );
        assert_eq!(result.errors().len(), 1);
        let err = &result.errors()[0];
        assert_eq!(err.kind, ValidationErrorKind::InvalidType);
        assert!(err.message.contains("expected type 'string' but got 'number'"));
    }

    #[test]
    fn test_array_reported_as_array() {
        let result = validate(
            &code_review_schema(),
            &vars(json!({"language": ["python"], "code": "print('hello world')"})),
        );
        assert!(result.errors()[0].message.contains("but got 'array'"));
    }

    #[test]
    fn test_min_length() {
        let result = validate(
            &code_review_schema(),
            &vars(json!({"language": "python", "code": "x = 1"})),
        );
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].kind, ValidationErrorKind::ValidationError);
        assert!(result.errors()[0].message.contains("Minimum length is 10"));
        assert_eq!(
            result.errors()[0].message,
            "Variable 'code': Minimum length is 10, but got 5"
        );
    }

    #[test]
    fn test_max_length() {
        let long = "a".repeat(10001);
        let result = validate(
            &code_review_schema(),
            &vars(json!({"language": "python", "code": long})),
        );
        assert_eq!(result.errors().len(), 1);
        assert!(result.errors()[0].message.contains("Maximum length is 10000"));
    }

    #[test]
    fn test_length_counts_characters() {
        let s = schema(json!({"variables": {"t": {"validation": {"maxLength": 3}}}}));
        assert!(validate(&s, &vars(json!({"t": "héé"}))).is_valid());
    }

    #[test]
    fn test_enum_violation() {
        let result = validate(
            &code_review_schema(),
            &vars(json!({"language": "ruby", "code": "puts 'hello world'"})),
        );
        assert_eq!(result.errors().len(), 1);
        assert!(result.errors()[0].message.contains("must be one of"));
        assert!(result.errors()[0]
            .message
            .ends_with("Value must be one of: typescript, python, javascript"));
    }

    #[test]
    fn test_numeric_bounds_inclusive() {
        let s = schema(json!({
            "variables": {"n": {"type": "number", "validation": {"min": 1, "max": 10}}}
        }));
        assert!(validate(&s, &vars(json!({"n": 1}))).is_valid());
        assert!(validate(&s, &vars(json!({"n": 10.0}))).is_valid());

        let low = validate(&s, &vars(json!({"n": 0})));
        assert_eq!(low.errors()[0].message, "Variable 'n': Minimum value is 1, but got 0");

        let high = validate(&s, &vars(json!({"n": 10.5})));
        assert_eq!(high.errors()[0].message, "Variable 'n': Maximum value is 10, but got 10.5");
    }

    #[test]
    fn test_multiple_rule_failures_on_one_variable() {
        let s = schema(json!({
            "variables": {
                "slug": {"validation": {"minLength": 5, "pattern": "^[a-z]+$", "enum": ["alpha", "gamma"]}}
            }
        }));
        let result = validate(&s, &vars(json!({"slug": "AB"})));
        assert_eq!(result.errors().len(), 3);
        assert!(result.errors()[0].message.contains("Minimum length is 5"));
        assert!(result.errors()[1].message.contains("does not match pattern: ^[a-z]+$"));
        assert!(result.errors()[2].message.contains("must be one of: alpha, gamma"));
        assert!(result.errors().iter().all(|e| e.variable == "slug"));
    }

    #[test]
    fn test_errors_across_variables_aggregate() {
        let s = schema(json!({
            "variables": {
                "a": {"required": true},
                "b": {"type": "number"},
                "c": {"type": "number", "validation": {"max": 2}}
            }
        }));
        let result = validate(&s, &vars(json!({"b": "two", "c": 3})));
        let kinds: Vec<ValidationErrorKind> = result.errors().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ValidationErrorKind::MissingRequiredVariable,
                ValidationErrorKind::InvalidType,
                ValidationErrorKind::ValidationError,
            ]
        );
    }

    #[test]
    fn test_enum_on_numbers_and_booleans() {
        let s = schema(json!({
            "variables": {
                "level": {"type": "number", "validation": {"enum": [1, 2, 3]}},
                "flag": {"type": "boolean", "validation": {"enum": [true]}}
            }
        }));
        assert!(validate(&s, &vars(json!({"level": 2.0, "flag": true}))).is_valid());
        let result = validate(&s, &vars(json!({"level": 4, "flag": false})));
        assert_eq!(result.errors().len(), 2);
        assert!(result.errors()[0].message.ends_with("Value must be one of: 1, 2, 3"));
        assert!(result.errors()[1].message.ends_with("Value must be one of: true"));
    }

    #[test]
    fn test_optional_absent_is_skipped() {
        let s = VariableSchema::new(vec![(
            "opt".to_string(),
            VariableDefinition::of_type(VariableType::Number),
        )])
        .unwrap();
        assert!(validate(&s, &VariableSet::new()).is_valid());
    }

    #[test]
    fn test_unknown_supplied_keys_are_ignored() {
        let result = validate(
            &code_review_schema(),
            &vars(json!({"language": "python", "code": "print('hello world')", "extra": 1})),
        );
        assert!(result.is_valid());
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_wire_shape() {
        let result = validate(&code_review_schema(), &vars(json!({"language": "python"})));
        let wire = serde_json::to_value(&result).unwrap();
        assert_eq!(
            wire,
            json!({
                "valid": false,
                "errors": [{
                    "variable": "code",
                    "error": "MissingRequiredVariable",
                    "message": "Variable 'code' is required but was not provided"
                }]
            })
        );
    }
}
