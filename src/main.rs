use clap::Parser;
use miette::Result;
use playt::cli::{logging, Cli, Commands};
use playt::core::Config;

fn main() -> Result<()> {
    // Terminate quietly on a closed pipe (`playt render t.md | head`)
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    let config = Config::load_with(global.config.as_deref());
    logging::init(&config, &global);

    match cli.command {
        Commands::Render(args) => playt::cli::commands::render::run(args, &config),
        Commands::Validate(args) => playt::cli::commands::validate::run(args),
        Commands::Inspect(args) => playt::cli::commands::inspect::run(args),
        Commands::Init(args) => playt::cli::commands::init::run(args),
        Commands::Completions(args) => playt::cli::commands::completions::run(args),
    }
}
