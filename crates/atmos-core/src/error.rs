//! Error types shared across the Atmos workspace.

use std::error::Error;
use std::fmt;

/// Errors detected during [`SimConfig::validate()`](crate::SimConfig::validate).
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// `sim_speed` is NaN, infinite, zero, or negative.
    InvalidSimSpeed {
        /// The invalid value.
        value: f32,
    },
    /// `drag` is outside `(0, 1]` or non-finite.
    InvalidDrag {
        /// The invalid value.
        value: f32,
    },
    /// A scale factor is negative or non-finite.
    InvalidFactor {
        /// Name of the offending field.
        name: &'static str,
        /// The invalid value.
        value: f32,
    },
    /// An epsilon threshold is negative or non-finite.
    InvalidEpsilon {
        /// Name of the offending field.
        name: &'static str,
        /// The invalid value.
        value: f32,
    },
    /// An explicit worker count of zero was requested.
    ZeroWorkers,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSimSpeed { value } => {
                write!(f, "sim_speed must be finite and positive, got {value}")
            }
            Self::InvalidDrag { value } => {
                write!(f, "drag must be in (0, 1], got {value}")
            }
            Self::InvalidFactor { name, value } => {
                write!(f, "{name} must be finite and non-negative, got {value}")
            }
            Self::InvalidEpsilon { name, value } => {
                write!(f, "{name} must be finite and non-negative, got {value}")
            }
            Self::ZeroWorkers => write!(f, "worker_count must be at least 1"),
        }
    }
}

impl Error for ConfigError {}
