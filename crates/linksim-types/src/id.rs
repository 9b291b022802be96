//! # linksim-types::id
//!
//! Defines the core identifier types used throughout the simulation.
//! Endpoints are addressed by caller-supplied names (conventionally "A" and
//! "B"); timers and events get monotonic numeric ids so stale instances can
//! be told apart from live ones.

/// A unique identifier for an endpoint, as supplied at registration.
pub type EndpointId = String;

/// A unique identifier for a per-frame timer armed by a protocol.
pub type TimerId = u64;

/// A unique identifier for a scheduled event in the master queue.
pub type EventId = u64;

/// The arming generation of an endpoint's single retransmission timer.
/// Every start/stop bumps it, invalidating timeouts armed earlier.
pub type TimerEpoch = u64;
