//! # linksim-types::time
//!
//! Defines the representation of time within the simulation.
//! All simulation time is discrete and represented in nanoseconds; a `u128`
//! prevents overflow for any practical simulation duration. The driver-facing
//! configuration surface speaks in seconds and is converted on the way in.

/// The fundamental unit of time in the simulation, measured in nanoseconds.
pub type SimTime = u128;

/// The start of simulation time.
pub const SIM_EPOCH: SimTime = 0;

/// Helper to convert milliseconds to `SimTime`.
pub const fn sim_from_ms(ms: u64) -> SimTime {
    (ms as u128) * 1_000_000
}

/// Helper to convert whole seconds to `SimTime`.
pub const fn sim_from_secs(secs: u64) -> SimTime {
    (secs as u128) * 1_000_000_000
}

/// Converts a non-negative floating-point seconds value (the configuration
/// surface's unit) to `SimTime`. Values are truncated to whole nanoseconds.
pub fn sim_from_secs_f64(secs: f64) -> SimTime {
    debug_assert!(secs >= 0.0 && secs.is_finite());
    (secs * 1e9) as SimTime
}

/// Renders a `SimTime` as fractional seconds for logs and reports.
pub fn sim_as_secs_f64(t: SimTime) -> f64 {
    t as f64 / 1e9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_round_cleanly() {
        assert_eq!(sim_from_ms(500), 500_000_000);
        assert_eq!(sim_from_secs(3), 3_000_000_000);
        assert_eq!(sim_from_secs_f64(0.5), 500_000_000);
        assert_eq!(sim_as_secs_f64(sim_from_secs_f64(1.25)), 1.25);
    }
}
