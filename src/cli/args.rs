//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, init::InitArgs, inspect::InspectArgs, render::RenderArgs,
    validate::ValidateArgs,
};

#[derive(Parser)]
#[command(name = "playt")]
#[command(author, version, about = "A prompt templating CLI")]
#[command(long_about = "Render and validate prompt templates whose YAML front matter declares the variables they accept.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct GlobalOpts {
    /// Log pipeline details to stderr
    #[arg(long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Extra config file, applied after the global and project configs
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a template with variables
    Render(RenderArgs),

    /// Validate variables against a template's schema
    Validate(ValidateArgs),

    /// Show template information
    Inspect(InspectArgs),

    /// Create a new template
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Variable sources shared by `render` and `validate`
#[derive(clap::Args, Clone, Debug, Default)]
pub struct VarArgs {
    /// Pass an individual variable (repeatable)
    #[arg(long = "var", short = 'v', value_name = "KEY=VALUE")]
    pub vars: Vec<String>,

    /// Load variables from a JSON (or .yaml/.yml) file
    #[arg(long = "vars", value_name = "FILE")]
    pub vars_file: Option<PathBuf>,

    /// Read variables from stdin (JSON)
    #[arg(long)]
    pub stdin: bool,
}

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_short_v_is_var() {
        let cli = Cli::try_parse_from([
            "playt", "render", "t.md", "-v", "name=Ada", "--var", "n=1", "--verbose",
        ])
        .unwrap();
        assert!(cli.global.verbose);
        match cli.command {
            Commands::Render(args) => {
                assert_eq!(args.vars.vars, vec!["name=Ada", "n=1"]);
                assert!(!args.no_validate);
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["playt", "--verbose", "-q", "inspect", "t.md"]).is_err());
    }
}
