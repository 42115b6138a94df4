//! Shape check for metadata blocks with detailed error reporting
//!
//! The metadata block is checked against an embedded JSON Schema before any
//! variable definition is read, so that every structural mistake is reported
//! in one pass with a label pointing at the offending key.

use jsonschema::{ValidationError as JsonSchemaError, Validator as JsonValidator};
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde_json::Value as JsonValue;
use std::sync::LazyLock;
use thiserror::Error;

/// The JSON Schema describing a template's metadata block
pub const METADATA_SCHEMA: &str = include_str!("../../schemas/metadata.schema.json");

static METADATA_VALIDATOR: LazyLock<JsonValidator> = LazyLock::new(|| {
    let schema: JsonValue =
        serde_json::from_str(METADATA_SCHEMA).expect("embedded metadata schema is valid JSON");
    jsonschema::validator_for(&schema).expect("embedded metadata schema compiles")
});

/// The metadata block does not have the shape of a template schema
#[derive(Debug, Error, Diagnostic)]
#[error("Malformed metadata block: {summary}")]
#[diagnostic(code(playt::schema::metadata))]
pub struct MetadataError {
    summary: String,

    #[source_code]
    src: NamedSource<String>,

    #[related]
    violations: Vec<ShapeViolation>,
}

/// A single shape violation
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct ShapeViolation {
    #[label("{}", self.hint)]
    span: SourceSpan,

    message: String,
    hint: String,

    #[help]
    help: Option<String>,
}

impl MetadataError {
    pub fn new(name: &str, document: &str, violations: Vec<ShapeViolation>) -> Self {
        let count = violations.len();
        let summary = if count == 1 {
            "1 error".to_string()
        } else {
            format!("{} errors", count)
        };
        Self {
            summary,
            src: NamedSource::new(name, document.to_string()),
            violations,
        }
    }

    /// Get the number of violations
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// Messages of all violations, in reporting order
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.message.as_str())
    }
}

/// Check a parsed metadata block.
///
/// `block` is the raw YAML text and `block_offset` its byte offset inside
/// `document`, used to place labels.
pub fn check_metadata(
    metadata: &JsonValue,
    name: &str,
    document: &str,
    block: &str,
    block_offset: usize,
) -> Result<(), MetadataError> {
    let violations: Vec<ShapeViolation> = METADATA_VALIDATOR
        .iter_errors(metadata)
        .map(|e| error_to_violation(block, block_offset, &e))
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        tracing::debug!(count = violations.len(), "metadata block failed shape check");
        Err(MetadataError::new(name, document, violations))
    }
}

/// Convert a JSON Schema validation error to our violation format
fn error_to_violation(block: &str, block_offset: usize, error: &JsonSchemaError) -> ShapeViolation {
    let path = error.instance_path.to_string();
    let message = format_schema_error(error);
    let hint = format_error_hint(error);
    let help = generate_help_message(error);

    let (offset, len) = find_path_span(block, &path);

    ShapeViolation {
        span: (block_offset + offset, len).into(),
        message,
        hint,
        help,
    }
}

/// Format a JSON Schema error into a user-facing message
fn format_schema_error(error: &JsonSchemaError) -> String {
    let path = if error.instance_path.as_str().is_empty() {
        "metadata root".to_string()
    } else {
        format!("'{}'", error.instance_path)
    };

    match &error.kind {
        jsonschema::error::ValidationErrorKind::Type { kind } => {
            format!("Wrong type at {}: expected {:?}", path, kind)
        }
        jsonschema::error::ValidationErrorKind::Enum { options } => {
            let opts = format_enum_options(options);
            format!("Invalid value at {}: must be one of: {}", path, opts)
        }
        jsonschema::error::ValidationErrorKind::Minimum { limit } => {
            format!("Value at {} is too small: minimum {}", path, limit)
        }
        jsonschema::error::ValidationErrorKind::AdditionalProperties { unexpected } => {
            format!("Unknown field(s) at {}: {}", path, unexpected.join(", "))
        }
        _ => {
            format!("Invalid metadata at {}: {}", path, error)
        }
    }
}

/// Format enum options as a string
fn format_enum_options(options: &JsonValue) -> String {
    if let Some(arr) = options.as_array() {
        arr.iter()
            .map(|v| v.as_str().map(|s| s.to_string()).unwrap_or_else(|| v.to_string()))
            .collect::<Vec<_>>()
            .join(", ")
    } else {
        options.to_string()
    }
}

/// Generate a short hint for the error label
fn format_error_hint(error: &JsonSchemaError) -> String {
    match &error.kind {
        jsonschema::error::ValidationErrorKind::Type { .. } => "wrong type".to_string(),
        jsonschema::error::ValidationErrorKind::Enum { .. } => "invalid value".to_string(),
        jsonschema::error::ValidationErrorKind::Minimum { .. } => "too small".to_string(),
        jsonschema::error::ValidationErrorKind::AdditionalProperties { .. } => "unknown field".to_string(),
        _ => "invalid".to_string(),
    }
}

/// Generate a help message with suggestions for fixing the error
fn generate_help_message(error: &JsonSchemaError) -> Option<String> {
    match &error.kind {
        jsonschema::error::ValidationErrorKind::Enum { options } => {
            Some(format!("Valid types: {}", format_enum_options(options)))
        }
        jsonschema::error::ValidationErrorKind::Type { .. } => {
            let path = error.instance_path.as_str();
            if path.starts_with("/variables/") && path.matches('/').count() == 2 {
                Some("A variable definition is a mapping, e.g. `name: { type: string, required: true }`".to_string())
            } else {
                None
            }
        }
        jsonschema::error::ValidationErrorKind::AdditionalProperties { unexpected } => {
            if unexpected.len() == 1 {
                Some(format!("Remove the '{}' field or check spelling", unexpected[0]))
            } else {
                Some("Remove unknown fields or check spelling".to_string())
            }
        }
        _ => None,
    }
}

/// Find the (offset, length) for a JSON pointer inside the YAML block
fn find_path_span(content: &str, json_path: &str) -> (usize, usize) {
    let parts: Vec<&str> = json_path.split('/').filter(|s| !s.is_empty()).collect();

    let first_line = || (0, content.find('\n').unwrap_or(content.len()).max(1));

    let Some(search_key) = parts.last() else {
        return first_line();
    };

    // Array indices point at the parent key
    if search_key.parse::<usize>().is_ok() && parts.len() >= 2 {
        if let Some(span) = find_key_span(content, parts[parts.len() - 2]) {
            return span;
        }
    }

    find_key_span(content, search_key).unwrap_or_else(first_line)
}

/// Find the span of `key:` at the start of a line
fn find_key_span(content: &str, key: &str) -> Option<(usize, usize)> {
    let search_pattern = format!("{}:", key);

    let mut offset = 0;
    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with(&search_pattern) {
            let key_start = offset + (line.len() - trimmed.len());
            return Some((key_start, trimmed.len()));
        }
        offset += line.len() + 1;
    }
    None
}
