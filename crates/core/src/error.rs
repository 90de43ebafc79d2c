//! Error types for fire simulation construction
//!
//! Only construction can fail. Once a [`crate::FireSimulation`] exists,
//! advancing it is infallible.

use thiserror::Error;

/// Errors raised while building a simulation or validating its configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FireError {
    /// Grid dimensions must both be positive.
    #[error("Invalid grid dimensions {width}x{height}: width and height must be positive")]
    InvalidDimensions {
        /// Requested grid width in cells
        width: usize,
        /// Requested grid height in cells
        height: usize,
    },

    /// A tuning parameter is out of its valid range.
    #[error("Invalid config parameter '{field}': {reason}")]
    InvalidConfig {
        /// Name of the offending field (e.g. `"decay_chance"`)
        field: &'static str,
        /// Description of the violated constraint
        reason: String,
    },
}

impl FireError {
    /// Create an [`FireError::InvalidConfig`] for a probability outside `[0, 1]`.
    pub(crate) fn chance_out_of_range(field: &'static str, value: f64) -> Self {
        Self::InvalidConfig {
            field,
            reason: format!("must be a probability in [0, 1], got {value}"),
        }
    }

    /// Create an [`FireError::InvalidConfig`] for a value that must be finite and non-negative.
    pub(crate) fn not_non_negative(field: &'static str, value: f64) -> Self {
        Self::InvalidConfig {
            field,
            reason: format!("must be finite and non-negative, got {value}"),
        }
    }
}

/// Result alias for fallible fire simulation operations.
pub type FireResult<T> = Result<T, FireError>;
