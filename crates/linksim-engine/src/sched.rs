//! # linksim-engine::sched
//!
//! The event scheduler: a min-heap of pending events keyed on timestamp,
//! with FIFO tie-breaking via a monotonic insertion sequence. Events
//! scheduled in the past are accepted (they dispatch next); the clock clamp
//! on dispatch lives in the façade.

use crate::events::{Event, Queued};
use linksim_types::{id::EndpointId, time::SimTime};
use std::collections::BinaryHeap;

#[derive(Default)]
pub struct EventScheduler {
    heap: BinaryHeap<Queued<Event>>,
    insert_seq: u64,
}

impl EventScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an event to fire at `at`.
    pub fn schedule(&mut self, at: SimTime, event: Event) {
        let seq = self.insert_seq;
        self.insert_seq += 1;
        self.heap.push(Queued::new(at, seq, event));
    }

    /// Removes and returns the earliest pending event.
    pub fn pop_earliest(&mut self) -> Option<Queued<Event>> {
        self.heap.pop()
    }

    /// Returns the earliest pending event without removing it.
    pub fn peek_earliest(&self) -> Option<&Queued<Event>> {
        self.heap.peek()
    }

    /// Drops every pending event targeted at `endpoint`, returning how many
    /// were removed.
    pub fn purge_for(&mut self, endpoint: &EndpointId) -> usize {
        let before = self.heap.len();
        self.heap.retain(|q| q.payload.target != *endpoint);
        before - self.heap.len()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
