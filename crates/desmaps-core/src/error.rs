//! Error types for desmaps-core
//!
//! Every error raised by the core is an invalid-argument error detected at
//! the boundary of the component that received the malformed input. Numeric
//! degeneracies (NaN, infinities) in the data itself are not errors; they
//! propagate through the computation as ordinary IEEE 754 values.

use thiserror::Error;

/// Errors raised by histogram construction, integration and tabulation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Histogram binning parameters are unusable
    #[error("Invalid binning: {message}")]
    InvalidBinning { message: String },

    /// Integration bounds are empty, reversed or not numbers
    #[error("Invalid integration range: min {min} must be less than max {max}")]
    InvalidRange { min: f64, max: f64 },

    /// Parallel input arrays disagree in length
    #[error("Length mismatch: {name} has {actual} entries, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Persisted bins do not form a valid histogram
    #[error("Invalid histogram: {message}")]
    InvalidHistogram { message: String },

    /// Configuration values out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CoreError {
    /// All core errors belong to the invalid-argument class.
    ///
    /// Kept as an explicit query so callers can branch on the class rather
    /// than on individual variants.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidBinning { .. }
                | CoreError::InvalidRange { .. }
                | CoreError::LengthMismatch { .. }
                | CoreError::InvalidHistogram { .. }
                | CoreError::InvalidConfig(_)
        )
    }
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Validation utilities
pub mod validation {
    use super::*;

    /// Validate that `[min, max]` is a non-degenerate range.
    ///
    /// NaN bounds fail the comparison and are rejected.
    pub fn validate_range(min: f64, max: f64) -> CoreResult<()> {
        if !(min < max) {
            return Err(CoreError::InvalidRange { min, max });
        }
        Ok(())
    }

    /// Validate that a parallel array matches the reference length
    pub fn validate_length(name: &str, expected: usize, actual: usize) -> CoreResult<()> {
        if expected != actual {
            return Err(CoreError::LengthMismatch {
                name: name.to_string(),
                expected,
                actual,
            });
        }
        Ok(())
    }
}
