//! # linksim-cli::commands::list_protocols
//!
//! Implements the `list-protocols` subcommand.

use anyhow::Result;
use linksim_proto::{build_protocol, TimerDiscipline};
use linksim_types::config::ProtocolKind;

pub fn exec() -> Result<()> {
    println!("{:<22} {:<14} {:<10} window", "name", "direction", "timers");
    for kind in ProtocolKind::all() {
        let proto = build_protocol(*kind, 4);
        let direction = if proto.is_bidirectional() {
            "bidirectional"
        } else {
            "simplex"
        };
        let timers = match proto.timer_discipline() {
            TimerDiscipline::Epoch => "epoch",
            TimerDiscipline::PerFrame => "per-frame",
        };
        let window = if kind.needs_window() { "2..=8" } else { "-" };
        println!("{:<22} {:<14} {:<10} {window}", proto.name(), direction, timers);
    }
    Ok(())
}
