//! # linksim-cli::commands::run
//!
//! Implements the `run` subcommand: load and validate a scenario, wire up
//! the simulator, drive it (tight or wall-clock-paced), and print the final
//! delivery report.

use crate::args::RunOpts;
use anyhow::{Context, Result};
use linksim_engine::prelude::*;
use linksim_types::scenario::Scenario;
use rand::Rng;
use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Serialize)]
struct EndpointReport {
    id: String,
    protocol: String,
    delivered: Vec<String>,
    stats: ProtocolStats,
}

#[derive(Serialize)]
struct RunReport {
    scenario: String,
    seed: u64,
    sim_time_secs: f64,
    endpoints: Vec<EndpointReport>,
}

pub fn exec(opts: RunOpts) -> Result<()> {
    let scenario = Scenario::load(&opts.scenario)
        .with_context(|| format!("loading scenario file {}", opts.scenario.display()))?;
    scenario.validate()?;

    let seed = opts
        .seed
        .or(scenario.seed)
        .unwrap_or_else(|| rand::thread_rng().gen());
    tracing::info!(scenario = %scenario.name, seed, "starting run");

    let mut sim = build_simulator(&scenario, seed)?;
    sim.set_observer(Box::new(|ev| match ev {
        TapEvent::PacketSent { frame, from, to, duration } => {
            tracing::info!(%from, %to, %frame, secs = sim_as_secs_f64(*duration), "frame on the wire");
        }
        TapEvent::PacketDelivered { packet, endpoint } => {
            tracing::info!(%endpoint, %packet, "delivered to network layer");
        }
    }));

    let stop_after = opts
        .stop_after
        .or(scenario.stop_after_secs)
        .map(sim_from_secs_f64);

    sim.start();
    if opts.paced {
        run_paced(&mut sim, stop_after);
    } else {
        match stop_after {
            Some(limit) => sim.advance_until(limit),
            None => sim.run(),
        }
    }

    let report = build_report(&scenario, seed, &sim);
    if opts.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn build_simulator(scenario: &Scenario, seed: u64) -> Result<Simulator> {
    let mut sim = Simulator::new(seed);
    for ep in &scenario.endpoints {
        sim.register_endpoint(&ep.id, scenario.protocol, &ep.link)?;
    }
    for rule in &scenario.corruptions {
        sim.force_corrupt_seq_once(&rule.endpoint, rule.seq);
    }
    // Each endpoint submits its payloads to the other one.
    for (idx, ep) in scenario.endpoints.iter().enumerate() {
        let peer = &scenario.endpoints[1 - idx].id;
        for payload in &ep.payloads {
            sim.send_data(&ep.id, peer, payload);
        }
    }
    Ok(sim)
}

/// The wall-clock-paced embedding: only events whose virtual timestamp has
/// been reached in real time are processed; otherwise the driver sleeps.
fn run_paced(sim: &mut Simulator, stop_after: Option<SimTime>) {
    let started = Instant::now();
    loop {
        let elapsed = sim_from_secs_f64(started.elapsed().as_secs_f64());
        let horizon = stop_after.map_or(elapsed, |limit| elapsed.min(limit));
        sim.advance_until(horizon);

        match sim.next_event_time() {
            None => break,
            Some(next) => {
                if stop_after.is_some_and(|limit| next > limit) {
                    break;
                }
                std::thread::sleep(Duration::from_millis(20));
            }
        }
    }
}

fn build_report(scenario: &Scenario, seed: u64, sim: &Simulator) -> RunReport {
    let endpoints = scenario
        .endpoints
        .iter()
        .map(|ep| EndpointReport {
            id: ep.id.clone(),
            protocol: sim.protocol_name(&ep.id).unwrap_or("?").to_string(),
            delivered: sim
                .delivered(&ep.id)
                .map(|packets| packets.iter().map(|p| p.data.clone()).collect())
                .unwrap_or_default(),
            stats: sim.stats(&ep.id).unwrap_or_default(),
        })
        .collect();
    RunReport {
        scenario: scenario.name.clone(),
        seed,
        sim_time_secs: sim_as_secs_f64(sim.current_time()),
        endpoints,
    }
}

fn print_report(report: &RunReport) {
    println!(
        "scenario '{}' (seed {}) finished at t={:.2}s",
        report.scenario, report.seed, report.sim_time_secs
    );
    for ep in &report.endpoints {
        println!("endpoint {} [{}]", ep.id, ep.protocol);
        println!("  delivered ({}): {:?}", ep.delivered.len(), ep.delivered);
        println!(
            "  data sent/received: {}/{}  acks: {}/{}  retransmissions: {}  duplicates: {}",
            ep.stats.data_sent,
            ep.stats.data_received,
            ep.stats.acks_sent,
            ep.stats.acks_received,
            ep.stats.retransmissions,
            ep.stats.duplicates,
        );
    }
}
