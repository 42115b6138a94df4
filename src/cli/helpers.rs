//! Shared helper functions for CLI commands
//!
//! Variable loading for `render` and `validate`, and error listing.

use console::style;
use miette::Diagnostic;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cli::args::VarArgs;
use crate::core::{VariableSet, VariableType};
use crate::schema::ValidationResult;

/// Errors raised while collecting variables from the command line
#[derive(Debug, Error, Diagnostic)]
pub enum VariableInputError {
    #[error("Variables file not found: {}", .0.display())]
    #[diagnostic(code(playt::vars::not_found))]
    FileNotFound(PathBuf),

    #[error("Failed to read {source_name}")]
    #[diagnostic(code(playt::vars::io))]
    Io {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {source_name}: {message}")]
    #[diagnostic(code(playt::vars::invalid_json))]
    InvalidJson { source_name: String, message: String },

    #[error("Invalid YAML in {source_name}: {message}")]
    #[diagnostic(code(playt::vars::invalid_yaml))]
    InvalidYaml { source_name: String, message: String },

    #[error("Variables from {source_name} must be an object, got {found}")]
    #[diagnostic(code(playt::vars::not_an_object))]
    NotAnObject { source_name: String, found: String },

    #[error("Invalid variable format: {0}")]
    #[diagnostic(code(playt::vars::invalid_format), help("Expected format: key=value"))]
    InvalidFormat(String),
}

/// Collect variables from `--vars`, `--stdin` and `--var`, in that order
pub fn load_variables(args: &VarArgs) -> Result<VariableSet, VariableInputError> {
    load_variables_from(args, std::io::stdin().lock())
}

/// Like [`load_variables`], reading stdin data from `stdin`
pub fn load_variables_from(
    args: &VarArgs,
    mut stdin: impl Read,
) -> Result<VariableSet, VariableInputError> {
    let mut variables = VariableSet::new();

    if let Some(ref path) = args.vars_file {
        variables.extend(read_vars_file(path)?);
    }

    if args.stdin {
        let mut data = String::new();
        stdin
            .read_to_string(&mut data)
            .map_err(|source| VariableInputError::Io {
                source_name: "stdin".to_string(),
                source,
            })?;
        let value: Value =
            serde_json::from_str(&data).map_err(|e| VariableInputError::InvalidJson {
                source_name: "stdin".to_string(),
                message: e.to_string(),
            })?;
        variables.extend(into_object(value, "stdin")?);
    }

    for assignment in &args.vars {
        let (key, value) = parse_assignment(assignment)?;
        variables.insert(key, value);
    }

    tracing::debug!(count = variables.len(), "loaded variables");
    Ok(variables)
}

fn read_vars_file(path: &Path) -> Result<VariableSet, VariableInputError> {
    if !path.exists() {
        return Err(VariableInputError::FileNotFound(path.to_path_buf()));
    }
    let source_name = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| VariableInputError::Io {
        source_name: source_name.clone(),
        source,
    })?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let value: Value = if is_yaml {
        serde_yml::from_str(&content).map_err(|e| VariableInputError::InvalidYaml {
            source_name: source_name.clone(),
            message: e.to_string(),
        })?
    } else {
        serde_json::from_str(&content).map_err(|e| VariableInputError::InvalidJson {
            source_name: source_name.clone(),
            message: e.to_string(),
        })?
    };

    into_object(value, &source_name)
}

fn into_object(value: Value, source_name: &str) -> Result<VariableSet, VariableInputError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(VariableInputError::NotAnObject {
            source_name: source_name.to_string(),
            found: VariableType::of(&other)
                .map(|t| t.to_string())
                .unwrap_or_else(|| "null".to_string()),
        }),
    }
}

/// Parse a `key=value` assignment
///
/// The value is read as JSON when it parses, otherwise kept as a string.
pub fn parse_assignment(assignment: &str) -> Result<(String, Value), VariableInputError> {
    let (key, raw) = assignment
        .split_once('=')
        .filter(|(k, v)| !k.is_empty() && !v.is_empty())
        .ok_or_else(|| VariableInputError::InvalidFormat(assignment.to_string()))?;

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

/// Print each validation message to stderr under `header`
pub fn print_validation_errors(header: &str, result: &ValidationResult) {
    eprintln!("{}", header);
    for error in result.errors() {
        eprintln!("  - {}", error.message);
    }
}

/// Print a success line with a green check mark
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_parse_assignment_json_values() {
        assert_eq!(parse_assignment("n=42").unwrap(), ("n".to_string(), json!(42)));
        assert_eq!(parse_assignment("flag=true").unwrap().1, json!(true));
        assert_eq!(parse_assignment("tags=[\"a\",\"b\"]").unwrap().1, json!(["a", "b"]));
        assert_eq!(parse_assignment("x=null").unwrap().1, Value::Null);
    }

    #[test]
    fn test_parse_assignment_falls_back_to_string() {
        assert_eq!(parse_assignment("name=Ada").unwrap().1, json!("Ada"));
        assert_eq!(parse_assignment("expr=a=b").unwrap(), ("expr".to_string(), json!("a=b")));
        assert_eq!(parse_assignment("s=\"quoted\"").unwrap().1, json!("quoted"));
    }

    #[test]
    fn test_parse_assignment_rejects_bad_format() {
        for bad in ["novalue", "=value", "key=", ""] {
            let err = parse_assignment(bad).unwrap_err();
            assert!(matches!(err, VariableInputError::InvalidFormat(_)), "{bad}");
        }
        assert_eq!(
            parse_assignment("key=").unwrap_err().to_string(),
            "Invalid variable format: key="
        );
    }

    #[test]
    fn test_sources_merge_in_order() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("vars.json");
        std::fs::write(&file, r#"{"a": "file", "b": "file", "c": "file"}"#).unwrap();

        let args = VarArgs {
            vars: vec!["c=cli".to_string()],
            vars_file: Some(file),
            stdin: true,
        };
        let vars = load_variables_from(&args, r#"{"b": "stdin", "c": "stdin"}"#.as_bytes()).unwrap();
        assert_eq!(Value::Object(vars), json!({"a": "file", "b": "stdin", "c": "cli"}));
    }

    #[test]
    fn test_yaml_vars_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("vars.yaml");
        std::fs::write(&file, "name: Ada\ncount: 3\n").unwrap();

        let args = VarArgs {
            vars_file: Some(file),
            ..Default::default()
        };
        let vars = load_variables_from(&args, std::io::empty()).unwrap();
        assert_eq!(Value::Object(vars), json!({"name": "Ada", "count": 3}));
    }

    #[test]
    fn test_missing_vars_file() {
        let args = VarArgs {
            vars_file: Some(PathBuf::from("/nonexistent/vars.json")),
            ..Default::default()
        };
        let err = load_variables_from(&args, std::io::empty()).unwrap_err();
        assert!(matches!(err, VariableInputError::FileNotFound(_)));
    }

    #[test]
    fn test_stdin_must_be_object() {
        let args = VarArgs {
            stdin: true,
            ..Default::default()
        };
        let err = load_variables_from(&args, "[1, 2]".as_bytes()).unwrap_err();
        assert!(matches!(err, VariableInputError::NotAnObject { ref found, .. } if found == "array"));

        let err = load_variables_from(&args, "{not json".as_bytes()).unwrap_err();
        assert!(matches!(err, VariableInputError::InvalidJson { .. }));
    }

    #[test]
    fn test_stdin_ignored_without_flag() {
        let vars = load_variables_from(&VarArgs::default(), "garbage".as_bytes()).unwrap();
        assert!(vars.is_empty());
    }
}
