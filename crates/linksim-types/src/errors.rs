//! # linksim-types::errors
//!
//! Common error types for the LinkSim workspace. `thiserror` keeps the
//! variants descriptive. Nothing here is fatal to the event loop; the
//! simulator logs, drops, or refuses and keeps running.

use thiserror::Error;

/// A general-purpose error for the simulation engine.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("endpoint {0:?} is already registered")]
    DuplicateEndpoint(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// An error raised while validating registration options or scenario files.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("error_rate {0} is outside [0, 1]")]
    ErrorRateOutOfRange(f64),
    #[error("transmission_delay {0} must be finite and >= 0")]
    InvalidDelay(f64),
    #[error("window_size {0} is outside [2, 8]")]
    WindowSizeOutOfRange(usize),
    #[error("protocol {0:?} requires a window_size")]
    MissingWindowSize(String),
    #[error("unknown protocol {0:?}")]
    UnknownProtocol(String),
    #[error("I/O error reading scenario file: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("validation error in scenario '{name}': {message}")]
    Validation { name: String, message: String },
}
