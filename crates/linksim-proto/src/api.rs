//! # linksim-proto::api
//!
//! The contract between a protocol state machine and the simulation engine.
//! A protocol reacts to the four event hooks and interacts with the outside
//! world only through the `LinkCtx` it is handed: frames down to the physical
//! layer, packets up to the network layer, and the timer service.

use linksim_types::{
    frame::{Frame, Packet},
    id::{EndpointId, TimerId},
    time::SimTime,
};
use serde::Serialize;

/// The timer discipline a protocol elects.
///
/// `Epoch` keeps a single outstanding retransmission timer per endpoint;
/// every arming invalidates prior arms. `PerFrame` allocates an independent
/// timer per outstanding frame, identified by a fresh `TimerId`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimerDiscipline {
    Epoch,
    PerFrame,
}

/// Counters every protocol keeps; surfaced through the simulator façade for
/// drivers, reports, and tests.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProtocolStats {
    pub data_sent: u64,
    pub data_received: u64,
    pub acks_sent: u64,
    pub acks_received: u64,
    pub naks_sent: u64,
    pub retransmissions: u64,
    pub duplicates: u64,
    pub buffered_out_of_order: u64,
}

/// The capabilities the hosting simulator exposes to a protocol.
///
/// All effects are synchronous from the protocol's point of view but
/// materialize as scheduled events inside the engine.
pub trait LinkCtx {
    /// Hands a frame to the physical layer for transmission to `dst`.
    fn to_physical(&mut self, frame: Frame, dst: &EndpointId);

    /// Delivers a packet upward to this endpoint's network layer.
    fn to_network(&mut self, packet: Packet);

    /// Whether the outbound queue has a payload waiting.
    fn outbound_ready(&self) -> bool;

    /// Takes the next `(payload, destination)` pair off the outbound queue.
    fn from_network(&mut self) -> Option<(Packet, EndpointId)>;

    /// Arms the endpoint's single retransmission timer, invalidating any
    /// previous arming (epoch discipline).
    fn start_timer(&mut self);

    /// Disarms the endpoint's single retransmission timer.
    fn stop_timer(&mut self);

    /// Arms a fresh, independent per-frame timer and returns its id.
    fn start_frame_timer(&mut self) -> TimerId;

    /// Cancels a per-frame timer. Returns false if it was no longer live.
    fn stop_frame_timer(&mut self, timer: TimerId) -> bool;

    /// Self-posts an immediate `NetworkReady` event so the protocol gets
    /// another chance to drain the outbound queue.
    fn enable_network_layer(&mut self);

    /// The current virtual time.
    fn now(&self) -> SimTime;

    /// The id of the endpoint hosting this protocol.
    fn endpoint_id(&self) -> &EndpointId;
}

/// A data-link protocol state machine.
///
/// The endpoint dispatcher validates timer tokens before invoking
/// `on_timeout`, so a protocol never observes a stale timer.
pub trait Protocol: Send {
    fn name(&self) -> &'static str;

    /// Governs whether the outer driver should also feed payloads from the
    /// receiving endpoint back to the sender.
    fn is_bidirectional(&self) -> bool {
        false
    }

    fn timer_discipline(&self) -> TimerDiscipline {
        TimerDiscipline::Epoch
    }

    /// Protocols may override the channel-derived timeout duration.
    fn timeout_override(&self) -> Option<SimTime> {
        None
    }

    /// Drain as much of the outbound queue as the window allows.
    fn on_network_ready(&mut self, ctx: &mut dyn LinkCtx);

    /// Handle a frame the channel certified intact.
    fn on_frame(&mut self, ctx: &mut dyn LinkCtx, src: &EndpointId, frame: Frame);

    /// Handle a frame the channel flagged corrupt.
    fn on_corrupt(&mut self, ctx: &mut dyn LinkCtx, src: &EndpointId, frame: Frame);

    /// Handle an expired timer. For epoch-discipline protocols the value is
    /// the arming epoch and can be ignored; for per-frame discipline it is
    /// the id returned by `start_frame_timer`.
    fn on_timeout(&mut self, ctx: &mut dyn LinkCtx, timer: TimerId);

    fn stats(&self) -> ProtocolStats;
}
