mod cli;
mod commands;
mod io;
mod logging;

use cli::{Cli, Commands};
use commands::{fetch, generate, save};

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    match &cli.command {
        Commands::Fetch(args) => fetch::run(&cli, args),
        Commands::Save(args) => save::run(&cli, args),
        Commands::Tessellate(args) => generate::tessellate(&cli, args),
        Commands::Depots(args) => generate::depots(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
