//! # linksim-cli::args
//!
//! Defines the command-line argument structure using `clap`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, default_value = "human")]
    pub log: LogFormat,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a simulation from a scenario file.
    Run(RunOpts),
    /// List all available protocols.
    ListProtocols,
    /// Validate a scenario file for correctness.
    Validate {
        #[arg(value_name = "SCENARIO_PATH")]
        scenario: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct RunOpts {
    /// Path to the scenario file (TOML or YAML).
    #[arg(short, long)]
    pub scenario: PathBuf,

    /// Override the RNG seed from the scenario file.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the stop time from the scenario file (in seconds).
    #[arg(long)]
    pub stop_after: Option<f64>,

    /// Pace event processing against the wall clock instead of draining
    /// the queue as fast as possible.
    #[arg(long)]
    pub paced: bool,

    /// Emit the final report as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Human,
    Json,
}
