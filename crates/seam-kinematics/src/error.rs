//! Error types for kinematics operations.

use thiserror::Error;

/// Errors that can occur during kinematics computations.
#[derive(Debug, Error)]
pub enum KinematicsError {
    /// Iterative IK did not converge from any seed.
    #[error("no inverse-kinematics solution found")]
    NoSolution,

    /// A joint angle violates its limits.
    #[error("joint {joint} angle {angle} outside [{min}, {max}]")]
    JointLimits {
        /// Index of the offending joint.
        joint: usize,
        /// The offending angle in radians.
        angle: f64,
        /// Lower limit in radians.
        min: f64,
        /// Upper limit in radians.
        max: f64,
    },

    /// The Jacobian is too close to singular for the requested operation.
    #[error("jacobian is singular at this configuration")]
    Singularity,
}

/// Result type for kinematics operations.
pub type KinematicsResult<T> = std::result::Result<T, KinematicsError>;
