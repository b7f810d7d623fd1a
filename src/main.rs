use clap::Parser;
use kanban::cli::commands::Cli;
use kanban::cli::context::Context;
use kanban::cli::handlers;
use kanban::io::logging;

fn run_tui(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load(cli)?;
    logging::init_file(&ctx.config_dir.join("kb.log"));
    kanban::tui::run(ctx)
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        // No subcommand → launch TUI
        None => run_tui(&cli),
        Some(_) => {
            logging::init_stderr();
            handlers::dispatch(cli)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
