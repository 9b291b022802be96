//! Recording `LinkCtx` double for exercising protocol state machines in
//! isolation. Every effect a protocol requests is captured so tests can
//! assert on the exact frames, deliveries, and timer operations produced.

use crate::api::LinkCtx;
use linksim_types::{
    frame::{Frame, Packet},
    id::{EndpointId, TimerId},
    time::SimTime,
};
use std::collections::VecDeque;

#[derive(Default)]
pub struct MockCtx {
    pub id: EndpointId,
    pub now: SimTime,
    pub outbound: VecDeque<(Packet, EndpointId)>,
    pub sent: Vec<(Frame, EndpointId)>,
    pub delivered: Vec<Packet>,
    pub epoch_starts: u32,
    pub epoch_stops: u32,
    pub live_frame_timers: Vec<TimerId>,
    pub network_ready_posts: u32,
    next_timer: TimerId,
}

impl MockCtx {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Default::default()
        }
    }

    pub fn queue(&mut self, payload: &str, dst: &str) {
        self.outbound.push_back((Packet::new(payload), dst.to_string()));
    }

    pub fn delivered_data(&self) -> Vec<&str> {
        self.delivered.iter().map(|p| p.data.as_str()).collect()
    }
}

impl LinkCtx for MockCtx {
    fn to_physical(&mut self, frame: Frame, dst: &EndpointId) {
        self.sent.push((frame, dst.clone()));
    }

    fn to_network(&mut self, packet: Packet) {
        self.delivered.push(packet);
    }

    fn outbound_ready(&self) -> bool {
        !self.outbound.is_empty()
    }

    fn from_network(&mut self) -> Option<(Packet, EndpointId)> {
        self.outbound.pop_front()
    }

    fn start_timer(&mut self) {
        self.epoch_starts += 1;
    }

    fn stop_timer(&mut self) {
        self.epoch_stops += 1;
    }

    fn start_frame_timer(&mut self) -> TimerId {
        let id = self.next_timer;
        self.next_timer += 1;
        self.live_frame_timers.push(id);
        id
    }

    fn stop_frame_timer(&mut self, timer: TimerId) -> bool {
        if let Some(pos) = self.live_frame_timers.iter().position(|t| *t == timer) {
            self.live_frame_timers.remove(pos);
            true
        } else {
            false
        }
    }

    fn enable_network_layer(&mut self) {
        self.network_ready_posts += 1;
    }

    fn now(&self) -> SimTime {
        self.now
    }

    fn endpoint_id(&self) -> &EndpointId {
        &self.id
    }
}
