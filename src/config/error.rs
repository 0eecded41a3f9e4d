//! Configuration errors.

use thiserror::Error;

/// A single rule a configuration broke.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigViolation {
    #[error("Band count {count} outside 1..={max}")]
    BandCount { count: usize, max: usize },

    #[error("Wipe duration must be greater than zero")]
    ZeroWipeDuration,

    #[error("Device pixel ratio cap {0} outside (0, {max}]", max = super::MAX_DPR_CAP)]
    PixelRatioCap(f64),

    #[error("Easing control point x values ({x1}, {x2}) must lie in [0, 1]")]
    EasingOutOfRange { x1: f64, x2: f64 },

    #[error("Easing control points must be finite")]
    NonFiniteEasing,

    #[error("Open visible fraction {0} outside (0, 1]")]
    VisibleFraction(f64),

    #[error("Open visible maximum {0}px must be positive")]
    VisibleMax(f64),
}

/// Errors loading or building a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON could not be parsed
    #[error("Config parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    /// Every rule the configuration broke, not only the first
    #[error("Invalid config ({} violation(s)): {}", .0.len(), join(.0))]
    Invalid(Vec<ConfigViolation>),
}

fn join(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
