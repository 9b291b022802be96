//! # linksim-proto::protocols::go_back_n
//!
//! Go-Back-N: a sender window of `W` outstanding frames over a sequence
//! space of `W + 1`, a receive window of one, cumulative acknowledgments,
//! and a single retransmission timer tied to the oldest outstanding frame.
//! On timeout everything from the window base onward goes out again.

use crate::api::{LinkCtx, Protocol, ProtocolStats};
use fxhash::FxHashMap;
use linksim_types::{
    frame::{Frame, FrameKind},
    id::{EndpointId, TimerId},
    seq::{between, dec, inc, SeqNum},
};

pub struct GoBackN {
    window: usize,
    modulus: SeqNum,
    // Sender side.
    send_base: SeqNum,
    next_seq: SeqNum,
    outstanding: FxHashMap<SeqNum, (Frame, EndpointId)>,
    // Receiver side.
    expected: SeqNum,
    stats: ProtocolStats,
}

impl GoBackN {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            modulus: window as SeqNum + 1,
            send_base: 0,
            next_seq: 0,
            outstanding: FxHashMap::default(),
            expected: 0,
            stats: ProtocolStats::default(),
        }
    }

    fn in_flight(&self) -> usize {
        ((self.next_seq + self.modulus - self.send_base) % self.modulus) as usize
    }

    /// Cumulative ack handling, shared by ACK frames and piggybacked fields.
    fn process_ack(&mut self, ctx: &mut dyn LinkCtx, ack: SeqNum) {
        let mut advanced = false;
        while between(self.send_base, ack, self.next_seq) {
            self.outstanding.remove(&self.send_base);
            self.send_base = inc(self.send_base, self.modulus);
            self.stats.acks_received += 1;
            advanced = true;
        }
        if advanced {
            tracing::debug!(endpoint = %ctx.endpoint_id(), ack, base = self.send_base, "window advanced");
            if self.send_base == self.next_seq {
                ctx.stop_timer();
            } else {
                // Restart for the new oldest outstanding frame.
                ctx.start_timer();
            }
            ctx.enable_network_layer();
        }
    }
}

impl Protocol for GoBackN {
    fn name(&self) -> &'static str {
        "go_back_n"
    }

    fn is_bidirectional(&self) -> bool {
        true
    }

    fn on_network_ready(&mut self, ctx: &mut dyn LinkCtx) {
        while self.in_flight() < self.window {
            let Some((packet, dst)) = ctx.from_network() else {
                break;
            };
            let frame = Frame::data(self.next_seq, dec(self.expected, self.modulus), packet);
            tracing::debug!(endpoint = %ctx.endpoint_id(), seq = frame.seq, ack = frame.ack, "sending data frame");
            self.outstanding.insert(self.next_seq, (frame.clone(), dst.clone()));
            let first_outstanding = self.send_base == self.next_seq;
            self.next_seq = inc(self.next_seq, self.modulus);
            self.stats.data_sent += 1;
            ctx.to_physical(frame, &dst);
            if first_outstanding {
                ctx.start_timer();
            }
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
                    self.expected = inc(self.expected, self.modulus);
                } else {
                    // Out of order: re-ack the last in-order frame.
                    self.stats.duplicates += 1;
                    self.stats.acks_sent += 1;
                    tracing::debug!(endpoint = %ctx.endpoint_id(), seq = frame.seq, expected = self.expected, "out-of-order data, re-acking");
                    ctx.to_physical(Frame::ack(dec(self.expected, self.modulus)), src);
                }
                self.process_ack(ctx, frame.ack);
            }
            FrameKind::Ack => {
                self.process_ack(ctx, frame.ack);
            }
            FrameKind::Nak => {
                tracing::debug!(endpoint = %ctx.endpoint_id(), "go-back-n does not use naks, ignoring");
            }
        }
    }

    fn on_corrupt(&mut self, ctx: &mut dyn LinkCtx, _src: &EndpointId, frame: Frame) {
        tracing::debug!(endpoint = %ctx.endpoint_id(), %frame, "corrupt frame dropped");
    }

    fn on_timeout(&mut self, ctx: &mut dyn LinkCtx, _timer: TimerId) {
        if self.send_base == self.next_seq {
            return;
        }
        tracing::info!(endpoint = %ctx.endpoint_id(), base = self.send_base, "timeout, retransmitting window");
        let mut seq = self.send_base;
        while seq != self.next_seq {
            if let Some((frame, dst)) = self.outstanding.get(&seq).cloned() {
                self.stats.retransmissions += 1;
                ctx.to_physical(frame, &dst);
            }
            seq = inc(seq, self.modulus);
        }
        ctx.start_timer();
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

    fn sender_with_queue(window: usize, n: usize) -> (GoBackN, MockCtx) {
        let mut ctx = MockCtx::new("A");
        for i in 0..n {
            ctx.queue(&i.to_string(), "B");
        }
        (GoBackN::new(window), ctx)
    }

    #[test]
    fn never_exceeds_the_window() {
        let (mut proto, mut ctx) = sender_with_queue(4, 6);

        proto.on_network_ready(&mut ctx);

        assert_eq!(ctx.sent.len(), 4);
        assert_eq!(proto.in_flight(), 4);
        let seqs: Vec<_> = ctx.sent.iter().map(|(f, _)| f.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2, 3]);
        assert_eq!(ctx.epoch_starts, 1, "one timer for the oldest frame");
    }

    #[test]
    fn cumulative_ack_advances_past_every_confirmed_slot() {
        let (mut proto, mut ctx) = sender_with_queue(4, 4);
        proto.on_network_ready(&mut ctx);

        // A single ACK for seq 2 confirms 0, 1 and 2.
        proto.on_frame(&mut ctx, &"B".to_string(), Frame::ack(2));

        assert_eq!(proto.send_base, 3);
        assert_eq!(proto.in_flight(), 1);
        assert_eq!(proto.stats().acks_received, 3);
        assert_eq!(ctx.epoch_starts, 2, "timer restarted for the remaining frame");
        assert_eq!(ctx.network_ready_posts, 1);
    }

    #[test]
    fn ack_for_whole_window_stops_the_timer() {
        let (mut proto, mut ctx) = sender_with_queue(4, 2);
        proto.on_network_ready(&mut ctx);

        proto.on_frame(&mut ctx, &"B".to_string(), Frame::ack(1));

        assert_eq!(proto.in_flight(), 0);
        assert_eq!(ctx.epoch_stops, 1);
    }

    #[test]
    fn duplicate_ack_outside_window_is_ignored() {
        let (mut proto, mut ctx) = sender_with_queue(4, 3);
        proto.on_network_ready(&mut ctx);
        proto.on_frame(&mut ctx, &"B".to_string(), Frame::ack(2));

        let posts = ctx.network_ready_posts;
        proto.on_frame(&mut ctx, &"B".to_string(), Frame::ack(2));

        assert_eq!(ctx.network_ready_posts, posts, "stale cumulative ack has no effect");
        assert_eq!(proto.in_flight(), 0);
    }

    #[test]
    fn timeout_retransmits_everything_outstanding_in_order() {
        let (mut proto, mut ctx) = sender_with_queue(4, 4);
        proto.on_network_ready(&mut ctx);
        proto.on_frame(&mut ctx, &"B".to_string(), Frame::ack(1));
        ctx.sent.clear();

        proto.on_timeout(&mut ctx, 0);

        let seqs: Vec<_> = ctx.sent.iter().map(|(f, _)| f.seq).collect();
        assert_eq!(seqs, vec![2, 3]);
        assert_eq!(proto.stats().retransmissions, 2);
    }

    #[test]
    fn receiver_reacks_last_in_order_on_gap() {
        let mut proto = GoBackN::new(4);
        let mut ctx = MockCtx::new("B");
        let a = "A".to_string();

        proto.on_frame(&mut ctx, &a, Frame::data(0, 4, Packet::new("0")));
        // Frame 1 lost; frame 2 arrives.
        proto.on_frame(&mut ctx, &a, Frame::data(2, 4, Packet::new("2")));

        assert_eq!(ctx.delivered_data(), vec!["0"]);
        let acks: Vec<_> = ctx.sent.iter().map(|(f, _)| f.ack).collect();
        assert_eq!(acks, vec![0, 0], "gap re-acks the last in-order frame");
    }
}
