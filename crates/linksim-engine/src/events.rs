//! # linksim-engine::events
//!
//! Defines the closed `EventKind` sum and the `Queued` wrapper struct.
//! `Queued` pairs a payload with its scheduled time and an insertion
//! sequence number for deterministic FIFO tie-breaking, making it suitable
//! for the `BinaryHeap` used as a priority queue.

use linksim_types::{
    frame::{Frame, Packet},
    id::{EndpointId, TimerEpoch, TimerId},
    time::SimTime,
};
use std::cmp::Ordering;

/// Identifies one arming of a timer. The two variants correspond to the two
/// timer disciplines: a single epoch-guarded timer per endpoint, or
/// independent per-frame timers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimerToken {
    Epoch(TimerEpoch),
    Frame(TimerId),
}

impl TimerToken {
    /// The raw value handed to `Protocol::on_timeout`.
    pub fn raw(self) -> u64 {
        match self {
            TimerToken::Epoch(e) => e,
            TimerToken::Frame(t) => t,
        }
    }
}

/// Everything that can happen in the simulation.
#[derive(Clone, Debug)]
pub enum EventKind {
    /// A frame the channel certified intact arrives at the data-link layer.
    FrameArrival { src: EndpointId, frame: Frame },
    /// A frame the channel flagged corrupt arrives at the data-link layer.
    CksumErr { src: EndpointId, frame: Frame },
    /// The network layer has (or may have) outbound payloads to drain.
    NetworkReady,
    /// Hand-off of a received packet from data-link to network layer.
    DeliverPacket { packet: Packet },
    /// A timer armed by a protocol has expired.
    Timeout { token: TimerToken },
}

impl EventKind {
    /// Short label for event logs.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::FrameArrival { .. } => "frame_arrival",
            EventKind::CksumErr { .. } => "cksum_err",
            EventKind::NetworkReady => "network_ready",
            EventKind::DeliverPacket { .. } => "deliver_packet",
            EventKind::Timeout { .. } => "timeout",
        }
    }
}

/// An event targeted at one endpoint.
#[derive(Clone, Debug)]
pub struct Event {
    pub target: EndpointId,
    pub kind: EventKind,
}

/// A wrapper for a scheduled payload; the type stored in the priority queue.
#[derive(Debug)]
pub struct Queued<T> {
    pub time: SimTime,
    /// Monotonic sequence number for stable ordering of events scheduled at
    /// the exact same time.
    pub insert_seq: u64,
    pub payload: T,
}

impl<T> Queued<T> {
    pub fn new(time: SimTime, insert_seq: u64, payload: T) -> Self {
        Self {
            time,
            insert_seq,
            payload,
        }
    }
}

// The following implementations make `BinaryHeap` behave as a deterministic
// min-heap: earlier time wins, and insertion order breaks ties.

impl<T> PartialEq for Queued<T> {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.insert_seq == other.insert_seq
    }
}

impl<T> Eq for Queued<T> {}

impl<T> PartialOrd for Queued<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Queued<T> {
    /// `BinaryHeap` is a max-heap, so the ordering is reversed to get a
    /// min-heap on `(time, insert_seq)`.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.insert_seq.cmp(&self.insert_seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    #[test]
    fn heap_pops_earliest_first_with_fifo_ties() {
        let mut heap = BinaryHeap::new();
        heap.push(Queued::new(20, 0, "late"));
        heap.push(Queued::new(10, 1, "first-at-10"));
        heap.push(Queued::new(10, 2, "second-at-10"));

        assert_eq!(heap.pop().unwrap().payload, "first-at-10");
        assert_eq!(heap.pop().unwrap().payload, "second-at-10");
        assert_eq!(heap.pop().unwrap().payload, "late");
    }
}
