//! # linksim-cli
//!
//! The main entry point for the LinkSim binary. Parses command-line
//! arguments and dispatches to the appropriate subcommand handler.

#![forbid(unsafe_code)]

use crate::args::{Cli, Command};
use anyhow::Result;
use clap::Parser;

mod args;
mod commands;
mod logging;

fn main() -> Result<()> {
    let args = Cli::parse();
    logging::init(args.log);

    match args.command {
        Command::Run(opts) => commands::run::exec(opts),
        Command::ListProtocols => commands::list_protocols::exec(),
        Command::Validate { scenario } => commands::validate::exec(scenario),
    }
}
