//! # linksim-engine::timers
//!
//! Per-endpoint timer bookkeeping for both disciplines. The epoch counter
//! backs the single retransmission timer: each arming or cancellation bumps
//! it, so a pending timeout event whose epoch no longer matches is stale.
//! The live set backs per-frame timers: a timeout fires only while its id is
//! in the set, and firing consumes the entry.

use fxhash::FxHashSet;
use linksim_types::id::{TimerEpoch, TimerId};

#[derive(Default)]
pub struct TimerService {
    epoch: TimerEpoch,
    live: FxHashSet<TimerId>,
}

impl TimerService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the single endpoint timer, invalidating prior arms. Returns the
    /// epoch to stamp on the scheduled timeout event.
    pub fn arm_epoch(&mut self) -> TimerEpoch {
        self.epoch += 1;
        self.epoch
    }

    /// Disarms the single endpoint timer by bumping the epoch.
    pub fn cancel_epoch(&mut self) {
        self.epoch += 1;
    }

    /// Whether an epoch-stamped timeout is still the live arming.
    pub fn fire_epoch(&self, epoch: TimerEpoch) -> bool {
        epoch == self.epoch
    }

    /// Registers a freshly allocated per-frame timer id as live.
    pub fn arm_frame(&mut self, timer: TimerId) {
        self.live.insert(timer);
    }

    /// Cancels a per-frame timer. Returns false if it was not live.
    pub fn cancel_frame(&mut self, timer: TimerId) -> bool {
        self.live.remove(&timer)
    }

    /// Checks and consumes a per-frame timeout; a timer fires at most once.
    pub fn fire_frame(&mut self, timer: TimerId) -> bool {
        self.live.remove(&timer)
    }

    pub fn live_frames(&self) -> usize {
        self.live.len()
    }
}
