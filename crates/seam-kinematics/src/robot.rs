//! Robot model: forward kinematics, Jacobian, manipulability, limits.

use nalgebra::{Matrix4, Matrix6, Vector3, Vector6};

use crate::dh::{DhParams, JointLimits};
use crate::error::{KinematicsError, KinematicsResult};
use crate::presets::{preset_tables, RobotType};

/// A six-joint serial arm described by DH parameters and joint limits.
///
/// Immutable after construction.
///
/// # Example
///
/// ```
/// use seam_kinematics::{RobotModel, RobotType};
///
/// let robot = RobotModel::new(RobotType::Ur5);
/// let pose = robot.forward_kinematics(&[0.0; 6]);
/// assert!((pose[(0, 3)] - (-0.81725)).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct RobotModel {
    dh: [DhParams; 6],
    limits: [JointLimits; 6],
    robot_type: RobotType,
}

impl RobotModel {
    /// Creates one of the shipped robot models.
    #[must_use]
    pub fn new(robot_type: RobotType) -> Self {
        let (dh, limits) = preset_tables(robot_type);
        Self {
            dh,
            limits,
            robot_type,
        }
    }

    /// Creates a robot from caller-supplied DH parameters and limits.
    #[must_use]
    pub const fn custom(dh: [DhParams; 6], limits: [JointLimits; 6]) -> Self {
        Self {
            dh,
            limits,
            robot_type: RobotType::Custom,
        }
    }

    /// The robot type tag.
    #[must_use]
    pub const fn robot_type(&self) -> RobotType {
        self.robot_type
    }

    /// The DH table.
    #[must_use]
    pub const fn dh(&self) -> &[DhParams; 6] {
        &self.dh
    }

    /// The joint limits.
    #[must_use]
    pub const fn limits(&self) -> &[JointLimits; 6] {
        &self.limits
    }

    /// Tool pose for the given joint angles as a homogeneous transform.
    #[must_use]
    pub fn forward_kinematics(&self, joints: &[f64; 6]) -> Matrix4<f64> {
        let mut t = Matrix4::identity();
        for (link, &theta) in self.dh.iter().zip(joints.iter()) {
            t *= link.transform(theta);
        }
        t
    }

    /// Cumulative transforms T⁰..T⁶, with T⁰ the identity.
    #[must_use]
    pub fn link_transforms(&self, joints: &[f64; 6]) -> [Matrix4<f64>; 7] {
        let mut transforms = [Matrix4::identity(); 7];
        for i in 0..6 {
            transforms[i + 1] = transforms[i] * self.dh[i].transform(joints[i]);
        }
        transforms
    }

    /// Geometric Jacobian: linear velocity rows on top, angular below.
    ///
    /// Column i is `(z_i × (p_e − p_i), z_i)` with `p_i` and `z_i` the
    /// origin and z axis of joint i's frame.
    #[must_use]
    pub fn jacobian(&self, joints: &[f64; 6]) -> Matrix6<f64> {
        let transforms = self.link_transforms(joints);
        let p_end = transforms[6].fixed_view::<3, 1>(0, 3).into_owned();

        let mut j = Matrix6::zeros();
        for i in 0..6 {
            let p_i = transforms[i].fixed_view::<3, 1>(0, 3).into_owned();
            let z_i: Vector3<f64> = transforms[i].fixed_view::<3, 1>(0, 2).into_owned();
            let linear = z_i.cross(&(p_end - p_i));

            for row in 0..3 {
                j[(row, i)] = linear[row];
                j[(row + 3, i)] = z_i[row];
            }
        }
        j
    }

    /// Yoshikawa manipulability index `√det(J·Jᵀ)`.
    ///
    /// Zero at singular configurations.
    #[must_use]
    pub fn manipulability(&self, joints: &[f64; 6]) -> f64 {
        let j = self.jacobian(joints);
        (j * j.transpose()).determinant().max(0.0).sqrt()
    }

    /// Cheap conditioning estimate `√(trace(J·Jᵀ)/6)`.
    ///
    /// Unlike [`Self::manipulability`] this does not vanish at
    /// singularities; it is a fast health indicator only.
    #[must_use]
    pub fn manipulability_trace(&self, joints: &[f64; 6]) -> f64 {
        let j = self.jacobian(joints);
        ((j * j.transpose()).trace() / 6.0).max(0.0).sqrt()
    }

    /// Returns true if every joint angle is within its limits.
    #[must_use]
    pub fn within_limits(&self, joints: &[f64; 6]) -> bool {
        self.limits
            .iter()
            .zip(joints.iter())
            .all(|(limit, &angle)| limit.contains(angle))
    }

    /// Checks the limits, reporting the first offending joint.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::JointLimits`] for the first joint outside
    /// its range.
    pub fn check_limits(&self, joints: &[f64; 6]) -> KinematicsResult<()> {
        for (i, (limit, &angle)) in self.limits.iter().zip(joints.iter()).enumerate() {
            if !limit.contains(angle) {
                return Err(KinematicsError::JointLimits {
                    joint: i,
                    angle,
                    min: limit.min_angle,
                    max: limit.max_angle,
                });
            }
        }
        Ok(())
    }

    /// Joint rates realizing a tool twist `(v, ω)` at this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::Singularity`] when the Jacobian cannot be
    /// inverted.
    pub fn joint_rates(&self, joints: &[f64; 6], twist: &Vector6<f64>) -> KinematicsResult<Vector6<f64>> {
        let j = self.jacobian(joints);
        let lu = j.lu();
        if lu.determinant().abs() < 1e-12 {
            return Err(KinematicsError::Singularity);
        }
        lu.solve(twist).ok_or(KinematicsError::Singularity)
    }

    /// Clamps every joint angle into its limits.
    pub(crate) fn clamp_to_limits(&self, joints: &mut [f64; 6]) {
        for (limit, angle) in self.limits.iter().zip(joints.iter_mut()) {
            *angle = limit.clamp(*angle);
        }
    }
}
