//! Playt: prompt templates with a declared variable schema
//!
//! A template is a text document with optional YAML front matter declaring
//! the variables it accepts. Rendering merges schema defaults with caller
//! values, runs the body through Tera and normalizes the output. Validation
//! is a separate pass that checks caller values against the schema.

pub mod cli;
pub mod core;
pub mod schema;
pub mod yaml;

pub use crate::core::{
    normalize, resolve, DocumentError, RenderError, Renderer, Template, TemplateEngine,
    TeraEngine, VariableSet, VariableType,
};
pub use crate::schema::{ValidationError, ValidationErrorKind, ValidationResult, VariableSchema};

/// Render `document` with the default engine.
///
/// No validation is performed; call [`validate`] first when needed.
pub fn render(document: &str, variables: Option<&VariableSet>) -> Result<String, RenderError> {
    Renderer::new(&TeraEngine::default()).render(document, variables)
}

/// Check `variables` against the schema declared in `document`
pub fn validate(
    document: &str,
    variables: Option<&VariableSet>,
) -> Result<ValidationResult, DocumentError> {
    let template = Template::parse(document)?;
    let empty = VariableSet::new();
    Ok(template.validate(variables.unwrap_or(&empty)))
}
