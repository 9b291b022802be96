//! # linksim-engine::sim
//!
//! The `Simulator` façade: the endpoint registry, the virtual clock, the
//! event queue, and the deterministic RNG, behind the small API drivers use.
//! `step` forms the core of the discrete-event loop; `run` drains the queue
//! (the tight driver) and `advance_until` processes only events whose
//! timestamp has been reached (the wall-clock-paced driver).

use crate::{
    channel::Channel,
    endpoint::Endpoint,
    events::EventKind,
    ids::IdGen,
    observer::{ObserverFn, TapEvent},
    sched::EventScheduler,
};
use indexmap::IndexMap;
use linksim_proto::{build_protocol, ProtocolStats};
use linksim_types::{
    config::{LinkConfig, ProtocolKind},
    errors::SimError,
    frame::Packet,
    id::EndpointId,
    seq::SeqNum,
    time::{sim_from_secs_f64, SimTime, SIM_EPOCH},
};
use rand::{RngCore, SeedableRng};
use rand_chacha::{ChaCha20Rng, ChaCha8Rng};

/// Shared engine state every layer can reach during event handling.
pub struct Core {
    pub(crate) clock: SimTime,
    pub(crate) sched: EventScheduler,
    pub(crate) ids: IdGen,
    pub(crate) observer: Option<ObserverFn>,
}

impl Core {
    pub(crate) fn new() -> Self {
        Self {
            clock: SIM_EPOCH,
            sched: EventScheduler::new(),
            ids: IdGen::new(),
            observer: None,
        }
    }

    pub fn now(&self) -> SimTime {
        self.clock
    }

    pub(crate) fn schedule(&mut self, at: SimTime, target: &EndpointId, kind: EventKind) {
        self.sched.schedule(
            at,
            crate::events::Event {
                target: target.clone(),
                kind,
            },
        );
    }

    pub(crate) fn emit(&mut self, event: &TapEvent) {
        if let Some(observer) = &mut self.observer {
            observer(event);
        }
    }
}

/// The execution state of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Paused,
    Halted,
}

/// The main simulation controller.
pub struct Simulator {
    core: Core,
    endpoints: IndexMap<EndpointId, Endpoint>,
    /// The master RNG; each endpoint's channel gets its own stream seeded
    /// from here, so runs are reproducible under a fixed seed.
    rng: ChaCha20Rng,
    state: RunState,
}

impl Simulator {
    pub fn new(seed: u64) -> Self {
        Self {
            core: Core::new(),
            endpoints: IndexMap::new(),
            rng: ChaCha20Rng::seed_from_u64(seed),
            state: RunState::Idle,
        }
    }

    /// Registers an endpoint running `kind` over a channel described by
    /// `config`. Fails loudly on invalid options or a duplicate id.
    pub fn register_endpoint(
        &mut self,
        id: &str,
        kind: ProtocolKind,
        config: &LinkConfig,
    ) -> Result<(), SimError> {
        config.validate(kind)?;
        if self.endpoints.contains_key(id) {
            return Err(SimError::DuplicateEndpoint(id.to_string()));
        }
        let delay = sim_from_secs_f64(config.transmission_delay);
        let stream = ChaCha8Rng::seed_from_u64(self.rng.next_u64());
        let channel = Channel::new(config.error_rate, delay, stream);
        let proto = build_protocol(kind, config.window_size.unwrap_or(1));
        tracing::info!(
            endpoint = %id,
            protocol = %kind,
            error_rate = config.error_rate,
            delay_s = config.transmission_delay,
            "endpoint registered"
        );
        self.endpoints
            .insert(id.to_string(), Endpoint::new(id.to_string(), proto, channel));
        Ok(())
    }

    /// Submits a payload at `from` addressed to `to`, waking the protocol
    /// with a `NetworkReady` event. Returns false if either id is unknown.
    pub fn send_data(&mut self, from: &str, to: &str, payload: &str) -> bool {
        if self.state == RunState::Halted {
            tracing::warn!("send_data on a halted simulator");
            return false;
        }
        if !self.endpoints.contains_key(to) {
            tracing::warn!(endpoint = %to, "send_data to unknown endpoint");
            return false;
        }
        let now = self.core.clock;
        let Some(ep) = self.endpoints.get_mut(from) else {
            tracing::warn!(endpoint = %from, "send_data from unknown endpoint");
            return false;
        };
        ep.network_mut().enqueue(Packet::new(payload), to.to_string());
        self.core.schedule(now, &from.to_string(), EventKind::NetworkReady);
        true
    }

    pub fn start(&mut self) {
        if matches!(self.state, RunState::Idle | RunState::Paused) {
            self.state = RunState::Running;
        }
    }

    /// Discards the remaining queue and marks the simulator halted.
    /// In-flight frames are abandoned.
    pub fn stop(&mut self) {
        let discarded = self.core.sched.len();
        self.core.sched.clear();
        self.state = RunState::Halted;
        tracing::info!(discarded, "simulation stopped");
    }

    pub fn pause(&mut self) {
        if self.state == RunState::Running {
            self.state = RunState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == RunState::Paused {
            self.state = RunState::Running;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.state == RunState::Paused
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Executes one event: advances the clock to its timestamp (never
    /// backward) and dispatches it. Returns `None` when the queue is empty
    /// or the simulator is not running.
    pub fn step(&mut self) -> Option<SimTime> {
        if self.state != RunState::Running {
            return None;
        }
        let queued = self.core.sched.pop_earliest()?;
        self.core.clock = self.core.clock.max(queued.time);
        tracing::trace!(
            target: "events",
            time = queued.time,
            kind = queued.payload.kind.label(),
            endpoint = %queued.payload.target,
            "dispatching event"
        );

        let Simulator {
            core, endpoints, ..
        } = self;
        match endpoints.get_mut(&queued.payload.target) {
            Some(ep) => ep.handle_event(core, queued.payload.kind),
            None => {
                tracing::warn!(endpoint = %queued.payload.target, "event for unknown endpoint dropped");
            }
        }
        Some(self.core.clock)
    }

    /// The tight driver: processes events until the queue drains.
    pub fn run(&mut self) {
        while self.step().is_some() {}
    }

    /// The paced driver's helper: processes only events whose timestamp is
    /// at or before `limit`. Pausing freezes progress; scheduled events are
    /// preserved across pause/resume.
    pub fn advance_until(&mut self, limit: SimTime) {
        while self.state == RunState::Running {
            match self.core.sched.peek_earliest() {
                Some(queued) if queued.time <= limit => {
                    self.step();
                }
                _ => break,
            }
        }
    }

    pub fn current_time(&self) -> SimTime {
        self.core.clock
    }

    /// Timestamp of the earliest pending event, if any. Paced drivers use
    /// this to decide how long to sleep.
    pub fn next_event_time(&self) -> Option<SimTime> {
        self.core.sched.peek_earliest().map(|q| q.time)
    }

    pub fn pending_events(&self) -> usize {
        self.core.sched.len()
    }

    /// Drops every pending event targeted at `id`.
    pub fn purge_endpoint_events(&mut self, id: &str) -> usize {
        self.core.sched.purge_for(&id.to_string())
    }

    /// Registers the synchronous observer tap.
    pub fn set_observer(&mut self, observer: ObserverFn) {
        self.core.observer = Some(observer);
    }

    /// Suppresses future sends on `id`'s channel. Returns false for an
    /// unknown endpoint.
    pub fn pause_endpoint(&mut self, id: &str) -> bool {
        match self.endpoints.get_mut(id) {
            Some(ep) => {
                ep.channel_mut().pause();
                true
            }
            None => false,
        }
    }

    pub fn resume_endpoint(&mut self, id: &str) -> bool {
        match self.endpoints.get_mut(id) {
            Some(ep) => {
                ep.channel_mut().resume();
                true
            }
            None => false,
        }
    }

    /// Forces the first DATA frame with `seq` sent by `id` to arrive
    /// corrupted. Returns false for an unknown endpoint.
    pub fn force_corrupt_seq_once(&mut self, id: &str, seq: SeqNum) -> bool {
        match self.endpoints.get_mut(id) {
            Some(ep) => {
                ep.channel_mut().force_corrupt_seq_once(seq);
                true
            }
            None => false,
        }
    }

    /// Packets delivered at `id`, in delivery order.
    pub fn delivered(&self, id: &str) -> Option<&[Packet]> {
        self.endpoints.get(id).map(|ep| ep.delivered())
    }

    pub fn stats(&self, id: &str) -> Option<ProtocolStats> {
        self.endpoints.get(id).map(|ep| ep.protocol().stats())
    }

    pub fn protocol_name(&self, id: &str) -> Option<&'static str> {
        self.endpoints.get(id).map(|ep| ep.protocol().name())
    }
}
