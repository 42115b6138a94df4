//! `playt inspect` command - Show template information

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::args::OutputFormat;
use crate::core::Template;
use crate::schema::VariableDefinition;

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    /// Template file to inspect
    pub template: PathBuf,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Machine-readable summary of a template
#[derive(Debug, Serialize)]
struct InspectReport<'a> {
    template: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    variables: Vec<VariableEntry<'a>>,
    lines: usize,
    characters: usize,
}

#[derive(Debug, Serialize)]
struct VariableEntry<'a> {
    name: &'a str,
    #[serde(flatten)]
    definition: &'a VariableDefinition,
}

pub fn run(args: InspectArgs) -> Result<()> {
    let template = Template::from_file(&args.template)?;
    let (lines, characters) = body_size(template.body());

    match args.format {
        OutputFormat::Json => {
            let report = InspectReport {
                template: args.template.display().to_string(),
                description: template.description(),
                variables: template
                    .schema()
                    .iter()
                    .map(|(name, definition)| VariableEntry { name, definition })
                    .collect(),
                lines,
                characters,
            };
            let json = serde_json::to_string_pretty(&report).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Text => print_text(&args.template, &template, lines, characters),
    }

    Ok(())
}

fn print_text(path: &std::path::Path, template: &Template, lines: usize, characters: usize) {
    println!("{} {}", style("Template:").bold(), path.display());
    println!();

    if let Some(description) = template.description().filter(|d| !d.is_empty()) {
        println!("{} {}", style("Description:").bold(), description);
        println!();
    }

    let (required, optional): (Vec<_>, Vec<_>) = template
        .schema()
        .iter()
        .partition(|(_, definition)| definition.required);

    if !required.is_empty() {
        println!("{}", style("Required Variables:").bold());
        for (name, definition) in &required {
            println!("  {}", describe_variable(name, definition));
        }
        println!();
    }

    if !optional.is_empty() {
        println!("{}", style("Optional Variables:").bold());
        for (name, definition) in &optional {
            println!("  {}", describe_variable(name, definition));
        }
    }

    if required.is_empty() && optional.is_empty() {
        println!("No variables defined");
        println!();
    }

    println!("Template size: {} lines, {} characters", lines, characters);
}

/// `name (type) - description [default: <json>]`, omitting absent parts
fn describe_variable(name: &str, definition: &VariableDefinition) -> String {
    let mut parts = vec![style(name).cyan().to_string()];
    if let Some(var_type) = definition.declared_type {
        parts.push(format!("({})", var_type));
    }
    if let Some(ref description) = definition.description {
        if !description.is_empty() {
            parts.push(format!("- {}", description));
        }
    }
    if let Some(ref default) = definition.default {
        parts.push(format!("[default: {}]", default));
    }
    parts.join(" ")
}

/// Line and character counts of a template body
fn body_size(body: &str) -> (usize, usize) {
    (body.trim().split('\n').count(), body.chars().count())
}
