//! Error types for ecosystem construction.
//!
//! The simulation itself is a closed numeric system; the only failures are
//! configuration problems detected before the first tick.

use thiserror::Error;

/// Failure to build an ecosystem from its configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// World too small to hold the boundary margin on both sides
    #[error("degenerate world {width}x{height}: both dimensions must exceed {min}")]
    DegenerateWorld { width: f32, height: f32, min: f32 },

    /// A tuning parameter would make a rule ill-defined
    #[error("invalid tuning: {0}")]
    InvalidTuning(&'static str),

    /// A caller-provided organism breaks a population invariant
    #[error("invalid organism at index {index}: {reason}")]
    InvalidOrganism { index: usize, reason: &'static str },

    /// Config file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for `EcosystemConfig`
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}
