//! # linksim-proto::protocols::par
//!
//! Positive Acknowledgment with Retransmission: simplex stop-and-wait over a
//! lossy channel. Sequence numbers alternate between 0 and 1; the sender
//! holds the last packet for retransmission and re-arms its single timer on
//! every (re)send. A duplicate at the receiver is re-acknowledged without
//! being delivered again.

use crate::api::{LinkCtx, Protocol, ProtocolStats};
use linksim_types::{
    frame::{Frame, FrameKind, Packet},
    id::{EndpointId, TimerId},
    seq::SeqNum,
};

#[derive(Default)]
pub struct Par {
    // Sender side.
    seq: SeqNum,
    waiting_for_ack: bool,
    last_packet: Option<Packet>,
    last_dst: Option<EndpointId>,
    // Receiver side.
    expected: SeqNum,
    stats: ProtocolStats,
}

impl Par {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Protocol for Par {
    fn name(&self) -> &'static str {
        "par"
    }

    fn on_network_ready(&mut self, ctx: &mut dyn LinkCtx) {
        if self.waiting_for_ack {
            tracing::debug!(endpoint = %ctx.endpoint_id(), seq = self.seq, "awaiting ack, holding data");
            return;
        }
        if let Some((packet, dst)) = ctx.from_network() {
            tracing::debug!(endpoint = %ctx.endpoint_id(), seq = self.seq, payload = %packet.data, "sending data frame");
            self.last_packet = Some(packet.clone());
            self.last_dst = Some(dst.clone());
            self.waiting_for_ack = true;
            self.stats.data_sent += 1;
            ctx.to_physical(Frame::data(self.seq, 0, packet), &dst);
            ctx.start_timer();
        }
    }

    fn on_frame(&mut self, ctx: &mut dyn LinkCtx, src: &EndpointId, frame: Frame) {
        match frame.kind {
            FrameKind::Data => {
                self.stats.data_received += 1;
                if frame.seq == self.expected {
                    if let Some(packet) = frame.payload {
                        ctx.to_network(packet);
                    }
                    self.stats.acks_sent += 1;
                    ctx.to_physical(Frame::ack(frame.seq), src);
                    self.expected = 1 - self.expected;
                } else {
                    // Duplicate: re-ack the frame we already delivered.
                    self.stats.duplicates += 1;
                    self.stats.acks_sent += 1;
                    tracing::debug!(endpoint = %ctx.endpoint_id(), seq = frame.seq, "duplicate data, re-acking");
                    ctx.to_physical(Frame::ack(1 - self.expected), src);
                }
            }
            FrameKind::Ack => {
                if self.waiting_for_ack && frame.ack == self.seq {
                    ctx.stop_timer();
                    self.seq = 1 - self.seq;
                    self.waiting_for_ack = false;
                    self.last_packet = None;
                    self.last_dst = None;
                    self.stats.acks_received += 1;
                    ctx.enable_network_layer();
                } else {
                    tracing::debug!(endpoint = %ctx.endpoint_id(), ack = frame.ack, "unexpected ack, ignoring");
                }
            }
            FrameKind::Nak => {
                tracing::debug!(endpoint = %ctx.endpoint_id(), "par does not use naks, ignoring");
            }
        }
    }

    fn on_corrupt(&mut self, ctx: &mut dyn LinkCtx, _src: &EndpointId, frame: Frame) {
        // Treated as never received; the sender's timer heals the loss.
        tracing::debug!(endpoint = %ctx.endpoint_id(), %frame, "corrupt frame dropped");
    }

    fn on_timeout(&mut self, ctx: &mut dyn LinkCtx, _timer: TimerId) {
        if !self.waiting_for_ack {
            return;
        }
        if let (Some(packet), Some(dst)) = (self.last_packet.clone(), self.last_dst.clone()) {
            tracing::info!(endpoint = %ctx.endpoint_id(), seq = self.seq, "timeout, retransmitting");
            self.stats.retransmissions += 1;
            ctx.to_physical(Frame::data(self.seq, 0, packet), &dst);
            ctx.start_timer();
        }
    }

    fn stats(&self) -> ProtocolStats {
        self.stats.clone()
    }
}
