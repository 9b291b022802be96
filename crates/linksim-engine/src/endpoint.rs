//! # linksim-engine::endpoint
//!
//! One simulated machine: the physical layer, the network layer, the timer
//! service, and the hosted protocol, wired together. The endpoint routes
//! incoming events to the protocol's hooks, validating timer tokens first so
//! a protocol never sees a stale timeout, and hands the protocol a `LinkCtx`
//! built from disjoint borrows of its own layers.

use crate::{
    channel::Channel,
    events::{EventKind, TimerToken},
    netlayer::NetworkLayer,
    sim::Core,
    timers::TimerService,
};
use linksim_proto::{LinkCtx, Protocol};
use linksim_types::{
    frame::{Frame, Packet},
    id::{EndpointId, TimerId},
    metrics as met,
    time::SimTime,
};

pub struct Endpoint {
    id: EndpointId,
    channel: Channel,
    net: NetworkLayer,
    timers: TimerService,
    proto: Box<dyn Protocol>,
}

impl Endpoint {
    pub fn new(id: EndpointId, proto: Box<dyn Protocol>, channel: Channel) -> Self {
        Self {
            id,
            channel,
            net: NetworkLayer::new(),
            timers: TimerService::new(),
            proto,
        }
    }

    pub fn id(&self) -> &EndpointId {
        &self.id
    }

    pub fn channel_mut(&mut self) -> &mut Channel {
        &mut self.channel
    }

    pub fn network_mut(&mut self) -> &mut NetworkLayer {
        &mut self.net
    }

    pub fn delivered(&self) -> &[Packet] {
        self.net.delivered()
    }

    pub fn protocol(&self) -> &dyn Protocol {
        self.proto.as_ref()
    }

    /// Routes one event into the protocol (or the network layer).
    pub fn handle_event(&mut self, core: &mut Core, kind: EventKind) {
        let Endpoint {
            id,
            channel,
            net,
            timers,
            proto,
        } = self;
        let timeout = proto
            .timeout_override()
            .unwrap_or_else(|| channel.timeout_duration());
        let mut ctx = EndpointCtx {
            core,
            id,
            channel,
            net,
            timers,
            timeout,
        };

        match kind {
            EventKind::FrameArrival { src, frame } => proto.on_frame(&mut ctx, &src, frame),
            EventKind::CksumErr { src, frame } => proto.on_corrupt(&mut ctx, &src, frame),
            EventKind::NetworkReady => proto.on_network_ready(&mut ctx),
            EventKind::DeliverPacket { packet } => ctx.net.deliver(ctx.core, ctx.id, packet),
            EventKind::Timeout { token } => {
                let live = match token {
                    TimerToken::Epoch(epoch) => ctx.timers.fire_epoch(epoch),
                    TimerToken::Frame(timer) => ctx.timers.fire_frame(timer),
                };
                if live {
                    tracing::debug!(target: "events", endpoint = %ctx.id, ?token, "⏰ timer fired");
                    metrics::counter!(met::MET_TIMER_FIRED, met::LBL_ENDPOINT => ctx.id.clone()).increment(1);
                    proto.on_timeout(&mut ctx, token.raw());
                } else {
                    tracing::debug!(target: "events", endpoint = %ctx.id, ?token, "stale timer dropped");
                    metrics::counter!(met::MET_TIMER_STALE, met::LBL_ENDPOINT => ctx.id.clone()).increment(1);
                }
            }
        }
    }
}

/// The `LinkCtx` implementation handed to protocols during event handling.
struct EndpointCtx<'a> {
    core: &'a mut Core,
    id: &'a EndpointId,
    channel: &'a mut Channel,
    net: &'a mut NetworkLayer,
    timers: &'a mut TimerService,
    timeout: SimTime,
}

impl LinkCtx for EndpointCtx<'_> {
    fn to_physical(&mut self, frame: Frame, dst: &EndpointId) {
        self.channel.send(self.core, self.id, frame, dst);
    }

    fn to_network(&mut self, packet: Packet) {
        // Hand-off to the network layer is itself an event, preserving the
        // strict one-event-at-a-time mutation discipline.
        let at = self.core.now();
        self.core.schedule(at, self.id, EventKind::DeliverPacket { packet });
    }

    fn outbound_ready(&self) -> bool {
        self.net.has_ready()
    }

    fn from_network(&mut self) -> Option<(Packet, EndpointId)> {
        self.net.take_next()
    }

    fn start_timer(&mut self) {
        let epoch = self.timers.arm_epoch();
        let at = self.core.now() + self.timeout;
        self.core.schedule(
            at,
            self.id,
            EventKind::Timeout {
                token: TimerToken::Epoch(epoch),
            },
        );
    }

    fn stop_timer(&mut self) {
        self.timers.cancel_epoch();
    }

    fn start_frame_timer(&mut self) -> TimerId {
        let timer = self.core.ids.next_timer_id();
        self.timers.arm_frame(timer);
        let at = self.core.now() + self.timeout;
        self.core.schedule(
            at,
            self.id,
            EventKind::Timeout {
                token: TimerToken::Frame(timer),
            },
        );
        timer
    }

    fn stop_frame_timer(&mut self, timer: TimerId) -> bool {
        self.timers.cancel_frame(timer)
    }

    fn enable_network_layer(&mut self) {
        let at = self.core.now();
        self.core.schedule(at, self.id, EventKind::NetworkReady);
    }

    fn now(&self) -> SimTime {
        self.core.now()
    }

    fn endpoint_id(&self) -> &EndpointId {
        self.id
    }
}
