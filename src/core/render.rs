//! Rendering orchestration: schema → merge → execute → normalize

use miette::Diagnostic;
use serde_json::Value;
use thiserror::Error;

use super::document::DocumentError;
use super::engine::{EngineError, TemplateEngine};
use super::normalize::normalize;
use super::resolver::resolve;
use super::template::Template;
use super::value::{VariableSet, VariableType};
use crate::schema::VariableSchema;

/// Errors that abort a render
#[derive(Debug, Error, Diagnostic)]
pub enum RenderError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Execution(#[from] EngineError),
}

/// Runs the render pipeline with a given execution engine
pub struct Renderer<'e, E: TemplateEngine> {
    engine: &'e E,
}

impl<'e, E: TemplateEngine> Renderer<'e, E> {
    pub fn new(engine: &'e E) -> Self {
        Self { engine }
    }

    /// Parse `document` and render it with `supplied` variables
    pub fn render(&self, document: &str, supplied: Option<&VariableSet>) -> Result<String, RenderError> {
        let template = Template::parse(document)?;
        let empty = VariableSet::new();
        self.render_template(&template, supplied.unwrap_or(&empty))
    }

    /// Render an already parsed template
    pub fn render_template(&self, template: &Template, supplied: &VariableSet) -> Result<String, RenderError> {
        let schema = template.schema();
        let merged = resolve(&schema.defaults(), supplied);
        tracing::debug!(
            template = template.name(),
            supplied = supplied.len(),
            merged = merged.len(),
            "resolved variables"
        );

        let context = bind_declared(schema, &merged);
        let raw = self.engine.execute(template.body().trim(), &context)?;
        Ok(normalize(&raw))
    }
}

/// Declared variables nobody set are bound to an empty value of their type.
///
/// Arrays become `[]` and objects `{}` so loops and attribute access see an
/// empty container; everything else is `null` and renders empty.
fn bind_declared(schema: &VariableSchema, merged: &VariableSet) -> VariableSet {
    let mut context = merged.clone();
    for (name, def) in schema.iter() {
        if context.get(name).is_some_and(|v| !v.is_null()) {
            continue;
        }
        let placeholder = match def.var_type() {
            VariableType::Array => Value::Array(Vec::new()),
            VariableType::Object => Value::Object(VariableSet::new()),
            _ => Value::Null,
        };
        context.insert(name.to_string(), placeholder);
    }
    context
}
