//! # linksim-proto::protocols::selective_repeat
//!
//! Selective Repeat: sender and receiver windows of `W` over a sequence
//! space of `2·W`, an independent timer per outstanding frame, out-of-order
//! buffering at the receiver, and at most one outstanding NAK. A timeout or
//! NAK retransmits exactly one frame.

use crate::api::{LinkCtx, Protocol, ProtocolStats, TimerDiscipline};
use fxhash::FxHashMap;
use linksim_types::{
    frame::{Frame, FrameKind, Packet},
    id::{EndpointId, TimerId},
    seq::{between, dec, inc, SeqNum},
};

struct Outstanding {
    frame: Frame,
    dst: EndpointId,
    timer: TimerId,
}

pub struct SelectiveRepeat {
    window: usize,
    modulus: SeqNum,
    // Sender side.
    send_base: SeqNum,
    next_seq: SeqNum,
    outstanding: FxHashMap<SeqNum, Outstanding>,
    timer_seqs: FxHashMap<TimerId, SeqNum>,
    // Receiver side.
    rcv_base: SeqNum,
    rcv_buffer: FxHashMap<SeqNum, Packet>,
    no_nak: bool,
    stats: ProtocolStats,
}

impl SelectiveRepeat {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            modulus: 2 * window as SeqNum,
            send_base: 0,
            next_seq: 0,
            outstanding: FxHashMap::default(),
            timer_seqs: FxHashMap::default(),
            rcv_base: 0,
            rcv_buffer: FxHashMap::default(),
            no_nak: true,
            stats: ProtocolStats::default(),
        }
    }

    fn in_receive_window(&self, seq: SeqNum) -> bool {
        between(self.rcv_base, seq, (self.rcv_base + self.window as SeqNum) % self.modulus)
    }

    /// Retransmits one outstanding frame with a fresh per-frame timer.
    fn retransmit(&mut self, ctx: &mut dyn LinkCtx, seq: SeqNum) {
        let Some(slot) = self.outstanding.get(&seq) else {
            return;
        };
        let old_timer = slot.timer;
        let frame = slot.frame.clone();
        let dst = slot.dst.clone();

        ctx.stop_frame_timer(old_timer);
        self.timer_seqs.remove(&old_timer);
        let timer = ctx.start_frame_timer();
        self.timer_seqs.insert(timer, seq);
        if let Some(slot) = self.outstanding.get_mut(&seq) {
            slot.timer = timer;
        }

        tracing::info!(endpoint = %ctx.endpoint_id(), seq, "retransmitting single frame");
        self.stats.retransmissions += 1;
        ctx.to_physical(frame, &dst);
    }

    fn handle_data(&mut self, ctx: &mut dyn LinkCtx, src: &EndpointId, frame: Frame) {
        let seq = frame.seq;
        self.stats.data_received += 1;

        if seq != self.rcv_base && self.no_nak {
            // Ask for the oldest missing frame; only one NAK may be pending.
            self.no_nak = false;
            self.stats.naks_sent += 1;
            ctx.to_physical(Frame::nak(dec(self.rcv_base, self.modulus)), src);
        }

        if self.in_receive_window(seq) && !self.rcv_buffer.contains_key(&seq) {
            if seq != self.rcv_base {
                self.stats.buffered_out_of_order += 1;
                tracing::debug!(endpoint = %ctx.endpoint_id(), seq, base = self.rcv_base, "buffering out-of-order frame");
            }
            if let Some(packet) = frame.payload {
                self.rcv_buffer.insert(seq, packet);
            }
            while let Some(packet) = self.rcv_buffer.remove(&self.rcv_base) {
                ctx.to_network(packet);
                self.rcv_base = inc(self.rcv_base, self.modulus);
                self.no_nak = true;
            }
        } else {
            self.stats.duplicates += 1;
            tracing::debug!(endpoint = %ctx.endpoint_id(), seq, "duplicate or out-of-window frame");
        }

        // Every DATA frame gets its own individual ack.
        self.stats.acks_sent += 1;
        ctx.to_physical(Frame::ack(seq), src);
    }

    fn handle_ack(&mut self, ctx: &mut dyn LinkCtx, ack: SeqNum) {
        let Some(slot) = self.outstanding.remove(&ack) else {
            tracing::debug!(endpoint = %ctx.endpoint_id(), ack, "ack outside send window, ignoring");
            return;
        };
        ctx.stop_frame_timer(slot.timer);
        self.timer_seqs.remove(&slot.timer);
        self.stats.acks_received += 1;

        if ack == self.send_base {
            // Slide past every contiguous acknowledged slot.
            while self.send_base != self.next_seq && !self.outstanding.contains_key(&self.send_base) {
                self.send_base = inc(self.send_base, self.modulus);
            }
            tracing::debug!(endpoint = %ctx.endpoint_id(), base = self.send_base, "send window advanced");
        }
        ctx.enable_network_layer();
    }
}

impl Protocol for SelectiveRepeat {
    fn name(&self) -> &'static str {
        "selective_repeat"
    }

    fn is_bidirectional(&self) -> bool {
        true
    }

    fn timer_discipline(&self) -> TimerDiscipline {
        TimerDiscipline::PerFrame
    }

    fn on_network_ready(&mut self, ctx: &mut dyn LinkCtx) {
        while self.outstanding.len() < self.window {
            let Some((packet, dst)) = ctx.from_network() else {
                break;
            };
            let frame = Frame::data(self.next_seq, 0, packet);
            let timer = ctx.start_frame_timer();
            tracing::debug!(endpoint = %ctx.endpoint_id(), seq = frame.seq, timer, "sending data frame");
            self.timer_seqs.insert(timer, self.next_seq);
            self.outstanding.insert(
                self.next_seq,
                Outstanding {
                    frame: frame.clone(),
                    dst: dst.clone(),
                    timer,
                },
            );
            self.next_seq = inc(self.next_seq, self.modulus);
            self.stats.data_sent += 1;
            ctx.to_physical(frame, &dst);
        }
    }

    fn on_frame(&mut self, ctx: &mut dyn LinkCtx, src: &EndpointId, frame: Frame) {
        match frame.kind {
            FrameKind::Data => self.handle_data(ctx, src, frame),
            FrameKind::Ack => self.handle_ack(ctx, frame.ack),
            FrameKind::Nak => {
                let wanted = inc(frame.ack, self.modulus);
                tracing::debug!(endpoint = %ctx.endpoint_id(), seq = wanted, "nak received");
                self.retransmit(ctx, wanted);
            }
        }
    }

    fn on_corrupt(&mut self, ctx: &mut dyn LinkCtx, src: &EndpointId, frame: Frame) {
        if self.no_nak {
            tracing::debug!(endpoint = %ctx.endpoint_id(), %frame, "corrupt frame, nacking the expected seq");
            self.no_nak = false;
            self.stats.naks_sent += 1;
            ctx.to_physical(Frame::nak(dec(self.rcv_base, self.modulus)), src);
        } else {
            tracing::debug!(endpoint = %ctx.endpoint_id(), %frame, "corrupt frame, nak already pending");
        }
    }

    fn on_timeout(&mut self, ctx: &mut dyn LinkCtx, timer: TimerId) {
        let Some(seq) = self.timer_seqs.remove(&timer) else {
            tracing::debug!(endpoint = %ctx.endpoint_id(), timer, "timeout for a settled frame, ignoring");
            return;
        };
        self.retransmit(ctx, seq);
    }

    fn stats(&self) -> ProtocolStats {
        self.stats.clone()
    }
}
