//! Template execution - substitutes merged variables into a body

use miette::Diagnostic;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::error::Error as _;
use std::sync::LazyLock;
use tera::{Context, Tera};
use thiserror::Error;

use super::value::VariableSet;

// `{%+` keeps leading whitespace
static LEADING_TAG_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]+(\{%[^+]|\{#)").expect("valid regex"));

// `+%}` keeps the newline
static TAG_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^+]%\}|#\})\r?\n").expect("valid regex"));

// `{% raw %}` sections are passed through untouched
static RAW_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{%-?\s*raw\s*-?%\}.*?\{%-?\s*endraw\s*-?%\}").expect("valid regex")
});

// `{{ path` followed by the tag end or its first filter
static OUTPUT_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\{\{(-?)(\s*)([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z0-9_]+|\[[^\]\}]*\])*)(\s*)(\|\s*[A-Za-z_][A-Za-z0-9_]*|-?\}\})",
    )
    .expect("valid regex")
});

/// Failure inside the execution engine
#[derive(Debug, Error, Diagnostic)]
#[error("Template execution failed: {message}")]
#[diagnostic(code(playt::engine::execution))]
pub struct EngineError {
    message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Something that can evaluate a template body against a variable set
pub trait TemplateEngine {
    fn execute(&self, body: &str, variables: &VariableSet) -> Result<String, EngineError>;
}

/// Whitespace handling around block tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Drop the first newline after a block or comment tag
    pub trim_blocks: bool,
    /// Drop spaces and tabs before a block or comment tag at line start
    pub lstrip_blocks: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            trim_blocks: true,
            lstrip_blocks: true,
        }
    }
}

/// Tera-backed engine.
///
/// Autoescaping is off and every call compiles the body afresh.
#[derive(Debug, Clone, Default)]
pub struct TeraEngine {
    options: EngineOptions,
}

impl TeraEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    /// Apply block whitespace control before handing the body to Tera
    fn prepare(&self, body: &str) -> String {
        let mut text = body.to_string();
        if self.options.lstrip_blocks {
            text = LEADING_TAG_WS.replace_all(&text, "${1}").into_owned();
        }
        if self.options.trim_blocks {
            text = TAG_NEWLINE.replace_all(&text, "${1}").into_owned();
        }
        // Tera has no `+` modifiers of its own
        let text = text.replace("{%+", "{%").replace("+%}", "%}");
        lenient_outputs(&text)
    }
}

/// Make `{{ path }}` output empty when `path` is undefined.
///
/// Tera resolves an undefined path to the `value` of a leading `default`
/// filter instead of failing, so one is inserted before any other filter.
fn lenient_outputs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for raw in RAW_BLOCK.find_iter(text) {
        out.push_str(&default_paths(&text[last..raw.start()]));
        out.push_str(raw.as_str());
        last = raw.end();
    }
    out.push_str(&default_paths(&text[last..]));
    out
}

fn default_paths(text: &str) -> Cow<'_, str> {
    OUTPUT_PATH.replace_all(text, |caps: &Captures<'_>| {
        let path = &caps[3];
        let next = &caps[5];
        let has_default = next
            .strip_prefix('|')
            .is_some_and(|filter| filter.trim_start() == "default");
        if has_default || matches!(path, "true" | "false" | "True" | "False") {
            return caps[0].to_string();
        }
        format!(
            "{{{{{}{}{} | default(value=\"\"){}{}",
            &caps[1], &caps[2], path, &caps[4], next
        )
    })
}

impl TemplateEngine for TeraEngine {
    fn execute(&self, body: &str, variables: &VariableSet) -> Result<String, EngineError> {
        let context = Context::from_serialize(variables).map_err(|e| describe(&e))?;
        let prepared = self.prepare(body);
        Tera::one_off(&prepared, &context, false).map_err(|e| describe(&e))
    }
}

/// Flatten a tera error and its causes into one message
fn describe(err: &tera::Error) -> EngineError {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    EngineError::new(message)
}
