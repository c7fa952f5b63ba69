//! Error types for path planning.

use thiserror::Error;

/// Errors that can occur during weld-path planning.
#[derive(Debug, Error)]
pub enum PathError {
    /// A numeric or count parameter was out of range.
    #[error("invalid parameter: {reason}")]
    InvalidParameter {
        /// Description of why the parameter is invalid.
        reason: String,
    },

    /// Not enough input points for the requested operation.
    #[error("insufficient points: need at least {required}, got {actual}")]
    InsufficientPoints {
        /// Minimum number of points required.
        required: usize,
        /// Actual number of points provided.
        actual: usize,
    },

    /// Positions and normals differ in length.
    #[error("positions and normals differ in length: {positions} vs {normals}")]
    MismatchedInputs {
        /// Number of positions provided.
        positions: usize,
        /// Number of normals provided.
        normals: usize,
    },

    /// The mesh has no boundary to trace.
    #[error("mesh has no boundary edges to trace a weld path along")]
    NoBoundary,
}

impl PathError {
    /// Builds an invalid-parameter error from a reason string.
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }
}

/// Result type for path-planning operations.
pub type PathResult<T> = std::result::Result<T, PathError>;
