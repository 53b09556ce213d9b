use clap::Parser;
use tracing::Level;

mod cli;
mod commands;
mod output;

use cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Smooth(args) => commands::smooth::execute(args),
        Command::Baseline(args) => commands::baseline::execute(args),
        Command::Process(args) => commands::process::execute(args),
        Command::Table(args) => commands::table::execute(args, &cli.data.resolve()?),
        Command::Session(args) => commands::session::execute(args, &cli.data.resolve()?),
        Command::Cells(args) => commands::cells::execute(args, &cli.data.resolve()?),
    }
}
