//! # linksim-engine::netlayer
//!
//! The network layer of one endpoint: a FIFO queue of payloads waiting to be
//! carried by the protocol, and the list of packets delivered upward. The
//! delivered list is the ground truth the testable delivery properties are
//! stated against.

use crate::{observer::TapEvent, sim::Core};
use linksim_types::{
    frame::Packet,
    id::EndpointId,
    metrics as met,
};
use std::collections::VecDeque;

#[derive(Default)]
pub struct NetworkLayer {
    outbound: VecDeque<(Packet, EndpointId)>,
    delivered: Vec<Packet>,
}

impl NetworkLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a payload for transmission to `dst`.
    pub fn enqueue(&mut self, packet: Packet, dst: EndpointId) {
        self.outbound.push_back((packet, dst));
    }

    pub fn has_ready(&self) -> bool {
        !self.outbound.is_empty()
    }

    /// Takes the oldest queued `(payload, destination)` pair.
    pub fn take_next(&mut self) -> Option<(Packet, EndpointId)> {
        self.outbound.pop_front()
    }

    /// Accepts an inbound packet from the data-link layer.
    pub(crate) fn deliver(&mut self, core: &mut Core, endpoint: &EndpointId, packet: Packet) {
        tracing::info!(target: "events", %endpoint, payload = %packet.data, "📦 packet delivered");
        metrics::counter!(met::MET_PACKET_DELIVERED, met::LBL_ENDPOINT => endpoint.clone()).increment(1);
        core.emit(&TapEvent::PacketDelivered {
            packet: packet.clone(),
            endpoint: endpoint.clone(),
        });
        self.delivered.push(packet);
    }

    /// Packets delivered so far, in delivery order.
    pub fn delivered(&self) -> &[Packet] {
        &self.delivered
    }
}
