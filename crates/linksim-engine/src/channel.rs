//! # linksim-engine::channel
//!
//! The physical layer of one endpoint. A channel delays every accepted frame
//! by its transmission delay and flips the corruption flag with probability
//! `error_rate`, drawing from its own seeded RNG stream. Deterministic
//! one-shot corruption rules let tests and scenario files force a specific
//! DATA frame to arrive damaged.

use crate::{events::EventKind, observer::TapEvent, sim::Core};
use linksim_types::{
    frame::{Frame, FrameKind},
    id::EndpointId,
    metrics as met,
    seq::SeqNum,
    time::{sim_from_secs, SimTime},
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Lower bound on the retransmission timeout regardless of channel delay.
const TIMEOUT_FLOOR: SimTime = sim_from_secs(3);

pub struct Channel {
    error_rate: f64,
    delay: SimTime,
    paused: bool,
    rng: ChaCha8Rng,
    corrupt_seq_once: Vec<SeqNum>,
}

impl Channel {
    pub fn new(error_rate: f64, delay: SimTime, rng: ChaCha8Rng) -> Self {
        Self {
            error_rate,
            delay,
            paused: false,
            rng,
            corrupt_seq_once: Vec::new(),
        }
    }

    pub fn delay(&self) -> SimTime {
        self.delay
    }

    /// The retransmission timeout this channel implies: comfortably above
    /// the round trip, with a floor for near-zero delays.
    pub fn timeout_duration(&self) -> SimTime {
        TIMEOUT_FLOOR.max(3 * self.delay)
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Registers a one-shot rule: the first DATA frame with `seq` sent
    /// through this channel arrives corrupted.
    pub fn force_corrupt_seq_once(&mut self, seq: SeqNum) {
        self.corrupt_seq_once.push(seq);
    }

    fn forced_corruption(&mut self, frame: &Frame) -> bool {
        if frame.kind != FrameKind::Data {
            return false;
        }
        if let Some(pos) = self.corrupt_seq_once.iter().position(|s| *s == frame.seq) {
            self.corrupt_seq_once.remove(pos);
            return true;
        }
        false
    }

    /// Accepts a frame for transmission, scheduling its arrival at `dst`.
    pub(crate) fn send(&mut self, core: &mut Core, src: &EndpointId, mut frame: Frame, dst: &EndpointId) {
        if self.paused {
            tracing::debug!(target: "events", %src, %dst, %frame, "channel paused, frame dropped");
            metrics::counter!(met::MET_FRAME_DROPPED, met::LBL_SRC => src.clone()).increment(1);
            return;
        }

        let corrupted =
            self.forced_corruption(&frame) || (self.error_rate > 0.0 && self.rng.gen_bool(self.error_rate));
        frame.corrupted = corrupted;

        core.emit(&TapEvent::PacketSent {
            frame: frame.clone(),
            from: src.clone(),
            to: dst.clone(),
            duration: self.delay,
        });
        metrics::counter!(met::MET_FRAME_SENT, met::LBL_SRC => src.clone()).increment(1);
        if corrupted {
            tracing::debug!(target: "events", %src, %dst, %frame, "frame corrupted in transit");
            metrics::counter!(met::MET_FRAME_CORRUPTED, met::LBL_SRC => src.clone()).increment(1);
        } else {
            tracing::debug!(target: "events", %src, %dst, %frame, "frame in transit");
        }

        let arrival = core.now() + self.delay;
        let kind = if corrupted {
            EventKind::CksumErr {
                src: src.clone(),
                frame,
            }
        } else {
            EventKind::FrameArrival {
                src: src.clone(),
                frame,
            }
        };
        core.schedule(arrival, dst, kind);
    }
}
