//! Document splitting - metadata block (YAML front matter) and body

use miette::Diagnostic;
use serde_json::Value as JsonValue;
use std::path::PathBuf;
use thiserror::Error;

use crate::schema::{check_metadata, MetadataError, SchemaError};
use crate::yaml::YamlSyntaxError;

/// Errors raised while reading a template document
#[derive(Debug, Error, Diagnostic)]
pub enum DocumentError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlSyntaxError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Schema(#[from] SchemaError),

    #[error("Template file not found: {}", .0.display())]
    #[diagnostic(code(playt::document::not_found))]
    NotFound(PathBuf),

    #[error("Failed to read template {}: {source}", path.display())]
    #[diagnostic(code(playt::document::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The raw metadata block of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataBlock<'a> {
    /// YAML text between the delimiters
    pub text: &'a str,
    /// Byte offset of `text` within the document
    pub offset: usize,
}

/// A document split into its metadata block and body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    pub block: Option<MetadataBlock<'a>>,
    pub body: &'a str,
}

/// Split a document on its `---` delimited front matter.
///
/// Without an opening delimiter on the first line, or without a closing
/// delimiter, the whole document is body.
pub fn split(source: &str) -> Split<'_> {
    let whole = Split { block: None, body: source };

    let start = if source.starts_with('\u{feff}') { '\u{feff}'.len_utf8() } else { 0 };
    let Some(first_end) = source[start..].find('\n').map(|i| start + i) else {
        return whole;
    };
    if source[start..first_end].trim_end() != "---" {
        return whole;
    }

    let block_start = first_end + 1;
    let mut pos = block_start;
    loop {
        let line_end = source[pos..].find('\n').map(|i| pos + i);
        let line = &source[pos..line_end.unwrap_or(source.len())];

        if line.trim_end() == "---" {
            let body_start = line_end.map(|e| e + 1).unwrap_or(source.len());
            return Split {
                block: Some(MetadataBlock {
                    text: &source[block_start..pos],
                    offset: block_start,
                }),
                body: &source[body_start..],
            };
        }

        match line_end {
            Some(end) => pos = end + 1,
            None => return whole,
        }
    }
}

/// Parse the metadata block into a JSON value and check its shape.
///
/// Returns `None` when the block is absent or holds no YAML content.
pub fn parse_metadata(
    source: &str,
    name: &str,
    block: Option<MetadataBlock<'_>>,
) -> Result<Option<JsonValue>, DocumentError> {
    let Some(block) = block else {
        return Ok(None);
    };
    if block.text.trim().is_empty() {
        return Ok(None);
    }

    let yaml: serde_yml::Value = serde_yml::from_str(block.text).map_err(|e| {
        YamlSyntaxError::from_serde_error(&e, source, name, block.text, block.offset)
    })?;
    if yaml.is_null() {
        return Ok(None);
    }

    // Non-string keys and tagged values do not survive the JSON boundary
    let json: JsonValue = serde_json::to_value(&yaml).map_err(|e| SchemaError::Definition {
        variable: "metadata".to_string(),
        message: e.to_string(),
    })?;

    check_metadata(&json, name, source, block.text, block.offset)?;
    Ok(Some(json))
}
