//! # linksim-engine::prelude
//!
//! Re-exports the most commonly used types from the engine and its
//! dependencies, simplifying imports for drivers and tests.

pub use crate::{
    channel::Channel,
    endpoint::Endpoint,
    events::{Event, EventKind, Queued, TimerToken},
    netlayer::NetworkLayer,
    observer::{ObserverFn, TapEvent},
    sched::EventScheduler,
    sim::{RunState, Simulator},
    timers::TimerService,
};

pub use linksim_types::{self, config::*, errors::*, frame::*, id::*, seq::*, time::*};

pub use linksim_proto::{self, LinkCtx, Protocol, ProtocolStats, TimerDiscipline};
