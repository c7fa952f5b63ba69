//! Error types for point-cloud operations.

use thiserror::Error;

/// Errors that can occur during point-cloud processing.
#[derive(Debug, Error)]
pub enum CloudError {
    /// A numeric or count parameter was out of range.
    #[error("invalid parameter: {reason}")]
    InvalidParameter {
        /// Description of why the parameter is invalid.
        reason: String,
    },

    /// The operation requires normals that the cloud does not carry.
    #[error("point cloud has no normals")]
    MissingNormals,
}

impl CloudError {
    /// Builds an invalid-parameter error from a reason string.
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }
}

/// Result type for point-cloud operations.
pub type CloudResult<T> = std::result::Result<T, CloudError>;
