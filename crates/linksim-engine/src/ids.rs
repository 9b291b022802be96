//! # linksim-engine::ids
//!
//! A generator for unique, monotonic timer ids. Per-frame timers must never
//! collide across the life of a simulation, so the counter is owned by the
//! façade core rather than any one endpoint.

use linksim_types::id::TimerId;

#[derive(Default)]
pub struct IdGen {
    timer_id: TimerId,
}

impl IdGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_timer_id(&mut self) -> TimerId {
        let id = self.timer_id;
        self.timer_id = self.timer_id.checked_add(1).expect("TimerId overflow");
        id
    }
}
