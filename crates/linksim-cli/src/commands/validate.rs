//! # linksim-cli::commands::validate
//!
//! Implements the `validate` subcommand: parse a scenario file, run the
//! consistency checks, and report the outcome without simulating anything.

use anyhow::{Context, Result};
use linksim_types::scenario::Scenario;
use std::path::PathBuf;

pub fn exec(path: PathBuf) -> Result<()> {
    let scenario = Scenario::load(&path)
        .with_context(|| format!("loading scenario file {}", path.display()))?;
    scenario.validate()?;

    println!(
        "Scenario '{}' is valid: protocol={}, endpoints={}",
        scenario.name,
        scenario.protocol,
        scenario
            .endpoints
            .iter()
            .map(|e| e.id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}
