//! `playt validate` command - Check variables against a template's schema

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::args::{OutputFormat, VarArgs};
use crate::cli::helpers::{load_variables, print_validation_errors};
use crate::core::Template;

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Template file to validate
    pub template: PathBuf,

    #[command(flatten)]
    pub vars: VarArgs,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let template = Template::from_file(&args.template)?;
    let variables = load_variables(&args.vars)?;
    let result = template.validate(&variables);

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&result).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            if result.is_valid() {
                println!("{} Template is valid", style("✓").green());
            } else {
                print_validation_errors(&format!("{} Validation errors:", style("✗").red()), &result);
            }
        }
    }

    if !result.is_valid() {
        std::process::exit(1);
    }
    Ok(())
}
