//! `playt render` command - Render a template with variables

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::args::VarArgs;
use crate::cli::helpers::{load_variables, print_validation_errors};
use crate::core::{Config, Renderer, Template, TeraEngine};

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// Template file to render
    pub template: PathBuf,

    #[command(flatten)]
    pub vars: VarArgs,

    /// Save result to file (default: stdout)
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Skip validation of variables
    #[arg(long)]
    pub no_validate: bool,
}

pub fn run(args: RenderArgs, config: &Config) -> Result<()> {
    let template = Template::from_file(&args.template)?;
    let variables = load_variables(&args.vars)?;

    if !args.no_validate && config.validate_before_render() {
        let result = template.validate(&variables);
        if !result.is_valid() {
            print_validation_errors("Validation errors:", &result);
            std::process::exit(1);
        }
    } else {
        tracing::debug!(template = template.name(), "validation skipped");
    }

    let engine = TeraEngine::new(config.engine_options());
    let rendered = Renderer::new(&engine).render_template(&template, &variables)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, &rendered).into_diagnostic()?;
            let shown = std::path::absolute(&path).unwrap_or(path);
            println!(
                "{} Rendered to: {}",
                style("✓").green(),
                style(shown.display()).cyan()
            );
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
