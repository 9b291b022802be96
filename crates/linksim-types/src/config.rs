//! # linksim-types::config
//!
//! The per-endpoint registration surface: which protocol runs on the
//! endpoint and the channel parameters. Validation is loud: bad options
//! fail registration instead of producing a quietly misconfigured run.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// The protocols the simulator can host.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolKind {
    Utopia,
    StopAndWait,
    Par,
    SlidingWindow1Bit,
    GoBackN,
    SelectiveRepeat,
}

impl ProtocolKind {
    /// Whether the outer driver should also feed payloads from B to A.
    pub fn is_bidirectional(self) -> bool {
        matches!(
            self,
            ProtocolKind::SlidingWindow1Bit | ProtocolKind::GoBackN | ProtocolKind::SelectiveRepeat
        )
    }

    /// Whether the protocol is parameterized by a sender window size.
    pub fn needs_window(self) -> bool {
        matches!(self, ProtocolKind::GoBackN | ProtocolKind::SelectiveRepeat)
    }

    pub fn all() -> &'static [ProtocolKind] {
        &[
            ProtocolKind::Utopia,
            ProtocolKind::StopAndWait,
            ProtocolKind::Par,
            ProtocolKind::SlidingWindow1Bit,
            ProtocolKind::GoBackN,
            ProtocolKind::SelectiveRepeat,
        ]
    }
}

impl std::fmt::Display for ProtocolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProtocolKind::Utopia => "utopia",
            ProtocolKind::StopAndWait => "stop_and_wait",
            ProtocolKind::Par => "par",
            ProtocolKind::SlidingWindow1Bit => "sliding_window_1bit",
            ProtocolKind::GoBackN => "go_back_n",
            ProtocolKind::SelectiveRepeat => "selective_repeat",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ProtocolKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "utopia" => Ok(ProtocolKind::Utopia),
            "stop_and_wait" => Ok(ProtocolKind::StopAndWait),
            "par" => Ok(ProtocolKind::Par),
            "sliding_window_1bit" => Ok(ProtocolKind::SlidingWindow1Bit),
            "go_back_n" => Ok(ProtocolKind::GoBackN),
            "selective_repeat" => Ok(ProtocolKind::SelectiveRepeat),
            other => Err(ConfigError::UnknownProtocol(other.to_string())),
        }
    }
}

/// Smallest and largest accepted sender window sizes.
pub const MIN_WINDOW: usize = 2;
pub const MAX_WINDOW: usize = 8;

/// Channel and window options supplied when registering an endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Per-frame probability that the channel flips the corruption flag.
    pub error_rate: f64,
    /// Seconds of virtual-time delay from send to arrival.
    pub transmission_delay: f64,
    /// Sender window for Go-Back-N / Selective Repeat.
    #[serde(default)]
    pub window_size: Option<usize>,
}

impl LinkConfig {
    pub fn new(error_rate: f64, transmission_delay: f64) -> Self {
        Self {
            error_rate,
            transmission_delay,
            window_size: None,
        }
    }

    pub fn with_window(mut self, window_size: usize) -> Self {
        self.window_size = Some(window_size);
        self
    }

    /// Checks the options against a protocol choice.
    pub fn validate(&self, kind: ProtocolKind) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.error_rate) || !self.error_rate.is_finite() {
            return Err(ConfigError::ErrorRateOutOfRange(self.error_rate));
        }
        if self.transmission_delay < 0.0 || !self.transmission_delay.is_finite() {
            return Err(ConfigError::InvalidDelay(self.transmission_delay));
        }
        if let Some(w) = self.window_size {
            if !(MIN_WINDOW..=MAX_WINDOW).contains(&w) {
                return Err(ConfigError::WindowSizeOutOfRange(w));
            }
        } else if kind.needs_window() {
            return Err(ConfigError::MissingWindowSize(kind.to_string()));
        }
        Ok(())
    }
}
