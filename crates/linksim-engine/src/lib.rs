//! # linksim-engine
//!
//! The discrete-event simulation kernel: the timestamped event queue, the
//! per-endpoint physical and network layers, the timer service, the endpoint
//! dispatcher, and the `Simulator` façade drivers talk to. The virtual clock
//! advances only by consuming events; all endpoint state is mutated inside
//! the handler of a single event, so the core needs no locks.

#![forbid(unsafe_code)]

pub mod channel;
pub mod endpoint;
pub mod events;
pub mod ids;
pub mod netlayer;
pub mod observer;
pub mod prelude;
pub mod sched;
pub mod sim;
pub mod timers;
