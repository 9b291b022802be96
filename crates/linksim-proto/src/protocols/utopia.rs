//! # linksim-proto::protocols::utopia
//!
//! The unrestricted simplex protocol: no sequencing, no acknowledgments, no
//! timers. Data flows one way over a channel assumed perfect; whatever
//! arrives intact is delivered.

use crate::api::{LinkCtx, Protocol, ProtocolStats};
use linksim_types::{
    frame::{Frame, FrameKind},
    id::{EndpointId, TimerId},
};

#[derive(Default)]
pub struct Utopia {
    stats: ProtocolStats,
}

impl Utopia {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Protocol for Utopia {
    fn name(&self) -> &'static str {
        "utopia"
    }

    fn on_network_ready(&mut self, ctx: &mut dyn LinkCtx) {
        if let Some((packet, dst)) = ctx.from_network() {
            tracing::debug!(endpoint = %ctx.endpoint_id(), payload = %packet.data, "sending data frame");
            self.stats.data_sent += 1;
            ctx.to_physical(Frame::data(0, 0, packet), &dst);
        }
    }

    fn on_frame(&mut self, ctx: &mut dyn LinkCtx, _src: &EndpointId, frame: Frame) {
        match frame.kind {
            FrameKind::Data => {
                if let Some(packet) = frame.payload {
                    self.stats.data_received += 1;
                    ctx.to_network(packet);
                }
            }
            _ => {
                tracing::debug!(endpoint = %ctx.endpoint_id(), %frame, "unexpected frame kind, ignoring");
            }
        }
    }

    fn on_corrupt(&mut self, ctx: &mut dyn LinkCtx, _src: &EndpointId, frame: Frame) {
        // No retransmission machinery; a corrupted frame is simply lost.
        tracing::debug!(endpoint = %ctx.endpoint_id(), %frame, "corrupt frame dropped");
    }

    fn on_timeout(&mut self, ctx: &mut dyn LinkCtx, _timer: TimerId) {
        tracing::debug!(endpoint = %ctx.endpoint_id(), "utopia arms no timers");
    }

    fn stats(&self) -> ProtocolStats {
        self.stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::MockCtx;
    use linksim_types::frame::Packet;

    #[test]
    fn sends_one_frame_per_ready_signal() {
        let mut proto = Utopia::new();
        let mut ctx = MockCtx::new("A");
        ctx.queue("0", "B");
        ctx.queue("1", "B");

        proto.on_network_ready(&mut ctx);
        proto.on_network_ready(&mut ctx);

        assert_eq!(ctx.sent.len(), 2);
        assert!(ctx.sent.iter().all(|(f, dst)| f.kind == FrameKind::Data && dst == "B"));
        assert_eq!(ctx.epoch_starts, 0);
    }

    #[test]
    fn delivers_arrivals_and_drops_corruption() {
        let mut proto = Utopia::new();
        let mut ctx = MockCtx::new("B");

        proto.on_frame(&mut ctx, &"A".to_string(), Frame::data(0, 0, Packet::new("x")));
        let mut corrupt = Frame::data(0, 0, Packet::new("y"));
        corrupt.corrupted = true;
        proto.on_corrupt(&mut ctx, &"A".to_string(), corrupt);

        assert_eq!(ctx.delivered_data(), vec!["x"]);
        assert!(ctx.sent.is_empty());
    }
}
