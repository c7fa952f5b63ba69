//! Error types for surface reconstruction.

use thiserror::Error;

/// Errors that can occur during surface reconstruction.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The input point cloud is empty.
    #[error("point cloud is empty")]
    EmptyCloud,

    /// The input point cloud has no normals.
    #[error("point cloud has no normals; estimate and orient normals first")]
    MissingNormals,

    /// A reconstruction parameter was out of range.
    #[error("invalid parameter: {reason}")]
    InvalidParameter {
        /// Description of why the parameter is invalid.
        reason: String,
    },

    /// The isosurface pass produced no geometry.
    #[error("reconstruction failed: {reason}")]
    ReconstructionFailed {
        /// Description of the failure.
        reason: String,
    },
}

impl SurfaceError {
    /// Builds an invalid-parameter error from a reason string.
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }
}

/// Result type for surface reconstruction operations.
pub type SurfaceResult<T> = std::result::Result<T, SurfaceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(format!("{}", SurfaceError::EmptyCloud), "point cloud is empty");

        let err = SurfaceError::invalid("depth must be in [6, 12]");
        assert!(format!("{err}").contains("depth"));
    }
}
