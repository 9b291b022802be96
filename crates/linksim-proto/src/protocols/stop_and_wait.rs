//! # linksim-proto::protocols::stop_and_wait
//!
//! Simplex stop-and-wait on an error-free channel. The sender pauses after
//! each DATA frame until the receiver's acknowledgment comes back; there is
//! no timer because nothing is ever lost.

use crate::api::{LinkCtx, Protocol, ProtocolStats};
use linksim_types::{
    frame::{Frame, FrameKind},
    id::{EndpointId, TimerId},
};

#[derive(Default)]
pub struct StopAndWait {
    waiting_for_ack: bool,
    stats: ProtocolStats,
}

impl StopAndWait {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Protocol for StopAndWait {
    fn name(&self) -> &'static str {
        "stop_and_wait"
    }

    fn on_network_ready(&mut self, ctx: &mut dyn LinkCtx) {
        if self.waiting_for_ack {
            tracing::debug!(endpoint = %ctx.endpoint_id(), "holding data until ack arrives");
            return;
        }
        if let Some((packet, dst)) = ctx.from_network() {
            tracing::debug!(endpoint = %ctx.endpoint_id(), payload = %packet.data, "sending data frame");
            self.waiting_for_ack = true;
            self.stats.data_sent += 1;
            ctx.to_physical(Frame::data(0, 0, packet), &dst);
        }
    }

    fn on_frame(&mut self, ctx: &mut dyn LinkCtx, src: &EndpointId, frame: Frame) {
        match frame.kind {
            FrameKind::Data => {
                if let Some(packet) = frame.payload {
                    self.stats.data_received += 1;
                    ctx.to_network(packet);
                }
                self.stats.acks_sent += 1;
                ctx.to_physical(Frame::ack(0), src);
            }
            FrameKind::Ack => {
                if self.waiting_for_ack {
                    self.waiting_for_ack = false;
                    self.stats.acks_received += 1;
                    ctx.enable_network_layer();
                } else {
                    tracing::warn!(endpoint = %ctx.endpoint_id(), "ack while not waiting, ignoring");
                }
            }
            FrameKind::Nak => {
                tracing::debug!(endpoint = %ctx.endpoint_id(), "nak has no meaning here, ignoring");
            }
        }
    }

    fn on_corrupt(&mut self, ctx: &mut dyn LinkCtx, _src: &EndpointId, frame: Frame) {
        // The channel is assumed error-free; corruption is a contract breach.
        tracing::warn!(endpoint = %ctx.endpoint_id(), %frame, "corrupt frame on an error-free channel");
    }

    fn on_timeout(&mut self, ctx: &mut dyn LinkCtx, _timer: TimerId) {
        tracing::debug!(endpoint = %ctx.endpoint_id(), "stop-and-wait arms no timers");
    }

    fn stats(&self) -> ProtocolStats {
        self.stats.clone()
    }
}
