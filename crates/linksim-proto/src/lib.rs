//! # linksim-proto
//!
//! The protocol SDK for LinkSim. Defines the `Protocol` trait every data-link
//! state machine implements, the `LinkCtx` context through which a protocol
//! reaches the hosting simulator, and the six classical protocol
//! implementations together with their name registry.

#![forbid(unsafe_code)]

pub mod api;
pub mod protocols;
pub mod registry;

#[cfg(test)]
pub(crate) mod testkit;

pub use api::{LinkCtx, Protocol, ProtocolStats, TimerDiscipline};
pub use registry::build_protocol;
