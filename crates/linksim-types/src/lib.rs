//! # linksim-types
//!
//! Foundational types shared by every crate in the LinkSim workspace:
//! identifiers, simulation time, sequence-number arithmetic, the frame and
//! packet models, per-endpoint configuration, scenario files, errors, and
//! metric name constants.

#![forbid(unsafe_code)]

pub mod config;
pub mod errors;
pub mod frame;
pub mod id;
pub mod metrics;
pub mod scenario;
pub mod seq;
pub mod time;
