//! `playt init` command - Create a new template from the starter scaffold

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::core::scaffold::ScaffoldGenerator;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Name of the template file (e.g., my-template.md)
    pub name: PathBuf,

    /// Template description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Overwrite the file if it already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = std::path::absolute(&args.name).into_diagnostic()?;

    if path.exists() && !args.force {
        return Err(miette::miette!(
            help = "Use --force to overwrite it",
            "File already exists: {}",
            path.display()
        ));
    }

    let generator = ScaffoldGenerator::new().map_err(|e| miette::miette!("{}", e))?;
    let content = generator
        .starter(args.description.as_deref())
        .map_err(|e| miette::miette!("{}", e))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).into_diagnostic()?;
    }
    std::fs::write(&path, content).into_diagnostic()?;

    let name = args.name.display();
    println!(
        "{} Created template: {}",
        style("✓").green(),
        style(path.display()).cyan()
    );
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize your template", name);
    println!(
        "  2. Test it: {}",
        style(format!("playt render {} -v name=\"World\"", name)).yellow()
    );
    println!(
        "  3. Inspect it: {}",
        style(format!("playt inspect {}", name)).yellow()
    );

    Ok(())
}
