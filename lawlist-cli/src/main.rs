use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

mod error;
mod settings;
mod subcommands;

/// Custom enumerators for markdown lists
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the edit-mode preview of markdown files
    Render(subcommands::render::Args),

    /// Generate the read-mode stylesheet for a settings file
    Stylesheet(subcommands::stylesheet::Args),

    /// Render a single pattern for one or more ordinals
    Label(subcommands::label::Args),

    /// Show how every list item of a file is resolved
    Inspect(subcommands::inspect::Args),
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Render(args) => subcommands::render::run(args),
        Commands::Stylesheet(args) => subcommands::stylesheet::run(args),
        Commands::Label(args) => subcommands::label::run(args),
        Commands::Inspect(args) => subcommands::inspect::run(args),
    };

    if let Err(e) = result {
        error::display(e);
        std::process::exit(1);
    }
}
