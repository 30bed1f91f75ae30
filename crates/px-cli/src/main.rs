//! px CLI - relocates Propel migration SQL into numbered files

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{extract, ls};

fn main() -> Result<()> {
    let cli = Cli::parse();
    commands::common::init_logging(cli.global.verbose);

    match &cli.command {
        cli::Commands::Extract(args) => extract::execute(args, &cli.global),
        cli::Commands::Ls(args) => ls::execute(args, &cli.global),
    }
}
