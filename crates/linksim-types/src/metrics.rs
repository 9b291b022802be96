//! # linksim-types::metrics
//!
//! Constants for metric names and labels. Centralizing these prevents typos
//! and keeps the engine (where metrics are emitted) and any consumer in
//! agreement.

// --- Metric Names ---
pub const MET_FRAME_SENT: &str = "linksim_frames_sent_total";
pub const MET_FRAME_CORRUPTED: &str = "linksim_frames_corrupted_total";
pub const MET_FRAME_DROPPED: &str = "linksim_frames_dropped_total";
pub const MET_PACKET_DELIVERED: &str = "linksim_packets_delivered_total";
pub const MET_TIMER_FIRED: &str = "linksim_timers_fired_total";
pub const MET_TIMER_STALE: &str = "linksim_timers_stale_total";

// --- Label Keys ---
pub const LBL_ENDPOINT: &str = "endpoint";
pub const LBL_SRC: &str = "src";
pub const LBL_DST: &str = "dst";
pub const LBL_REASON: &str = "reason";
