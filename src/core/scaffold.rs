//! Starter templates for `playt init`

use rust_embed::Embed;
use tera::Tera;
use thiserror::Error;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

/// Name of the embedded starter template
pub const STARTER: &str = "init.md.tera";

/// Description used when none is given
pub const DEFAULT_DESCRIPTION: &str = "A new Playt template";

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("Scaffold not found: {0}")]
    NotFound(String),

    #[error("Scaffold rendering error: {0}")]
    RenderError(String),
}

/// Generates new template files from embedded scaffolds
pub struct ScaffoldGenerator {
    tera: Tera,
}

impl ScaffoldGenerator {
    /// Create a generator with the embedded scaffolds loaded
    pub fn new() -> Result<Self, ScaffoldError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| ScaffoldError::RenderError(e.to_string()))?;
                }
            }
        }

        Ok(Self { tera })
    }

    /// Render the starter template
    pub fn starter(&self, description: Option<&str>) -> Result<String, ScaffoldError> {
        if !self.tera.get_template_names().any(|n| n == STARTER) {
            return Err(ScaffoldError::NotFound(STARTER.to_string()));
        }

        let mut context = tera::Context::new();
        context.insert("description", description.unwrap_or(DEFAULT_DESCRIPTION));

        self.tera
            .render(STARTER, &context)
            .map_err(|e| ScaffoldError::RenderError(e.to_string()))
    }
}
