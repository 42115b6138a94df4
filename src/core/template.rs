//! Parsed prompt templates

use std::path::Path;

use super::document::{parse_metadata, split, DocumentError};
use super::engine::TemplateEngine;
use super::render::{RenderError, Renderer};
use super::value::{display_value, VariableSet};
use crate::schema::{validate, ValidationResult, VariableSchema};

/// Name used in diagnostics for templates that did not come from a file
pub const INLINE_NAME: &str = "<template>";

/// A prompt template: its declared schema and its (unrendered) body
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    description: Option<String>,
    schema: VariableSchema,
    body: String,
}

impl Template {
    /// Parse a template held in memory
    pub fn parse(source: &str) -> Result<Self, DocumentError> {
        Self::parse_named(source, INLINE_NAME)
    }

    /// Parse a template, using `name` in diagnostics
    pub fn parse_named(source: &str, name: &str) -> Result<Self, DocumentError> {
        let parts = split(source);
        let metadata = parse_metadata(source, name, parts.block)?;

        let (description, schema) = match metadata {
            Some(ref meta) => (
                meta.get("description")
                    .filter(|d| !d.is_null())
                    .map(display_value),
                VariableSchema::from_metadata(meta)?,
            ),
            None => (None, VariableSchema::default()),
        };

        tracing::debug!(
            template = name,
            has_metadata = metadata.is_some(),
            variables = schema.len(),
            body_len = parts.body.len(),
            "parsed template"
        );

        Ok(Self {
            name: name.to_string(),
            description,
            schema,
            body: parts.body.to_string(),
        })
    }

    /// Read and parse a template file
    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        if !path.exists() {
            return Err(DocumentError::NotFound(path.to_path_buf()));
        }
        let source = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_named(&source, &path.display().to_string())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn schema(&self) -> &VariableSchema {
        &self.schema
    }

    /// The body exactly as written after the metadata block
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Check caller-supplied (pre-merge) variables against the schema
    pub fn validate(&self, supplied: &VariableSet) -> ValidationResult {
        validate(&self.schema, supplied)
    }

    /// Render with the given engine; performs no validation
    pub fn render_with<E: TemplateEngine>(
        &self,
        engine: &E,
        supplied: &VariableSet,
    ) -> Result<String, RenderError> {
        Renderer::new(engine).render_template(self, supplied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::TeraEngine;
    use crate::core::value::VariableType;
    use serde_json::json;

    const CODE_REVIEW: &str = r#"---
description: Review a snippet of code
variables:
  language:
    type: string
    required: true
    validation:
      enum: [typescript, python, javascript]
  code:
    required: true
    validation:
      minLength: 10
  strict:
    type: boolean
    default: false
---

Review this {{ language }} code:

{{ code }}
{% if strict %}
Be strict.
{% endif %}
"#;

    #[test]
    fn test_parse_reads_schema_and_description() {
        let template = Template::parse(CODE_REVIEW).unwrap();
        assert_eq!(template.name(), INLINE_NAME);
        assert_eq!(template.description(), Some("Review a snippet of code"));
        assert_eq!(template.schema().len(), 3);
        assert_eq!(
            template.schema().get("strict").unwrap().var_type(),
            VariableType::Boolean
        );
        assert!(template.body().starts_with("\nReview this"));
    }

    #[test]
    fn test_parse_without_metadata() {
        let template = Template::parse("Just {{ text }}").unwrap();
        assert!(template.description().is_none());
        assert!(template.schema().is_empty());
        assert_eq!(template.body(), "Just {{ text }}");
    }

    #[test]
    fn test_validate_uses_raw_variables() {
        let template = Template::parse(CODE_REVIEW).unwrap();
        let mut supplied = VariableSet::new();
        supplied.insert("language".into(), json!("ruby"));
        let result = template.validate(&supplied);
        assert_eq!(result.errors().len(), 2);
        assert_eq!(result.errors()[0].variable, "language");
        assert_eq!(result.errors()[1].variable, "code");
    }

    #[test]
    fn test_render_with_engine() {
        let template = Template::parse(CODE_REVIEW).unwrap();
        let mut supplied = VariableSet::new();
        supplied.insert("language".into(), json!("python"));
        supplied.insert("code".into(), json!("print('hi')"));
        supplied.insert("strict".into(), json!(true));

        let out = template.render_with(&TeraEngine::default(), &supplied).unwrap();
        assert_eq!(out, "Review this python code:\n\nprint('hi')\nBe strict.");
    }

    #[test]
    fn test_empty_fields_are_accepted() {
        let source = "---\ndescription:\nvariables:\n  name:\n    type: string\n    description:\n    validation:\n---\nHi {{ name }}";
        let template = Template::parse(source).unwrap();
        assert!(template.description().is_none());
        assert!(template.validate(&VariableSet::new()).is_valid());
        assert_eq!(template.render_with(&TeraEngine::default(), &VariableSet::new()).unwrap(), "Hi");
    }

    #[test]
    fn test_scalar_description_is_shown_as_text() {
        let template = Template::parse("---\ndescription: 42\n---\nx").unwrap();
        assert_eq!(template.description(), Some("42"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = Template::from_file(Path::new("/definitely/not/here.md")).unwrap_err();
        assert!(matches!(err, DocumentError::NotFound(_)));
    }

    #[test]
    fn test_invalid_pattern_surfaces_as_schema_error() {
        let source = "---\nvariables:\n  x:\n    validation:\n      pattern: \"(\"\n---\n{{ x }}";
        let err = Template::parse(source).unwrap_err();
        assert!(matches!(err, DocumentError::Schema(_)));
    }
}
