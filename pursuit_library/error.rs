//! Error types for the pursuit engine
//!
//! Every failure in the engine is a configuration problem: either a
//! plant/loop that cannot be simulated or a setting outside its domain.
//! Angle and distance math is total and never fails.

use thiserror::Error;

/// Errors raised while configuring or stepping a tracker
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PursuitError {
    #[error("Dimension mismatch in {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Invalid {gain} gain for {loop_name} loop: {value} is not finite")]
    InvalidGain {
        loop_name: &'static str,
        gain: &'static str,
        value: f64,
    },

    #[error("Sample period must be positive and finite, got {0}")]
    InvalidSamplePeriod(f64),

    #[error("Simulation step must be positive and finite, got {0}")]
    InvalidStep(f64),

    #[error("Maximum distance must be non-negative and finite, got {0}")]
    InvalidMaxDistance(f64),

    #[error("Invalid {what}: {value} is not finite")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid time grid: {0}")]
    InvalidTimeGrid(String),

    #[error("Closed loop cannot be realised: numerator degree {numerator}, denominator degree {denominator}")]
    ImproperLoop { numerator: usize, denominator: usize },

    #[error("Plant matrix {0} contains non-finite entries")]
    NonFiniteMatrix(&'static str),
}

/// Result type for pursuit operations
pub type PursuitResult<T> = Result<T, PursuitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_message() {
        let err = PursuitError::DimensionMismatch {
            what: "input sequence",
            expected: 13,
            found: 12,
        };
        assert_eq!(
            err.to_string(),
            "Dimension mismatch in input sequence: expected 13, found 12"
        );
    }

    #[test]
    fn test_invalid_gain_message() {
        let err = PursuitError::InvalidGain {
            loop_name: "heading",
            gain: "Kd",
            value: f64::NAN,
        };
        assert!(err.to_string().contains("Kd gain for heading loop"));
    }
}
