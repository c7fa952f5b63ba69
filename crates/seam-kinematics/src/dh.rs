//! Denavit-Hartenberg link parameters and transforms.

use nalgebra::Matrix4;

/// DH parameters of one link in the standard (Craig/Spong) convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DhParams {
    /// Link length in meters.
    pub a: f64,
    /// Link twist in radians.
    pub alpha: f64,
    /// Link offset in meters.
    pub d: f64,
    /// Joint angle offset in radians, added to the commanded angle.
    pub theta_offset: f64,
}

impl DhParams {
    /// Creates DH parameters for one link.
    #[must_use]
    pub const fn new(a: f64, alpha: f64, d: f64, theta_offset: f64) -> Self {
        Self {
            a,
            alpha,
            d,
            theta_offset,
        }
    }

    /// The link transform at commanded joint angle `theta` (the stored
    /// offset is added internally).
    #[must_use]
    pub fn transform(&self, theta: f64) -> Matrix4<f64> {
        dh_transform(self.a, self.alpha, self.d, theta + self.theta_offset)
    }
}

/// Position and velocity limits of one joint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointLimits {
    /// Minimum angle in radians.
    pub min_angle: f64,
    /// Maximum angle in radians.
    pub max_angle: f64,
    /// Maximum angular velocity in radians per second.
    pub max_velocity: f64,
    /// Maximum angular acceleration in radians per second squared.
    pub max_acceleration: f64,
}

impl JointLimits {
    /// Creates joint limits.
    #[must_use]
    pub const fn new(min_angle: f64, max_angle: f64, max_velocity: f64, max_acceleration: f64) -> Self {
        Self {
            min_angle,
            max_angle,
            max_velocity,
            max_acceleration,
        }
    }

    /// Returns true if `angle` respects the position limits.
    #[must_use]
    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.min_angle && angle <= self.max_angle
    }

    /// Clamps `angle` into the position limits.
    #[must_use]
    pub fn clamp(&self, angle: f64) -> f64 {
        angle.clamp(self.min_angle, self.max_angle)
    }
}

/// The standard DH link transform
///
/// ```text
/// [ cθ   -sθ·cα   sθ·sα   a·cθ ]
/// [ sθ    cθ·cα  -cθ·sα   a·sθ ]
/// [  0      sα      cα      d  ]
/// [  0      0       0       1  ]
/// ```
///
/// with all angles in radians.
#[must_use]
pub fn dh_transform(a: f64, alpha: f64, d: f64, theta: f64) -> Matrix4<f64> {
    let (st, ct) = theta.sin_cos();
    let (sa, ca) = alpha.sin_cos();

    Matrix4::new(
        ct,
        -st * ca,
        st * sa,
        a * ct,
        st,
        ct * ca,
        -ct * sa,
        a * st,
        0.0,
        sa,
        ca,
        d,
        0.0,
        0.0,
        0.0,
        1.0,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn identity_link() {
        let t = dh_transform(0.0, 0.0, 0.0, 0.0);
        assert_relative_eq!(t, Matrix4::identity(), epsilon = 1e-12);
    }

    #[test]
    fn pure_rotation() {
        let t = dh_transform(0.0, 0.0, 0.0, FRAC_PI_2);
        assert_relative_eq!(t[(0, 0)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(t[(0, 1)], -1.0, epsilon = 1e-12);
        assert_relative_eq!(t[(1, 0)], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn offset_and_length() {
        let t = dh_transform(0.5, 0.0, 0.25, 0.0);
        assert_relative_eq!(t[(0, 3)], 0.5, epsilon = 1e-12);
        assert_relative_eq!(t[(2, 3)], 0.25, epsilon = 1e-12);
    }

    #[test]
    fn twist_moves_z_axis() {
        let t = dh_transform(0.0, -FRAC_PI_2, 0.0, 0.0);
        // Third rotation column is the link z axis expressed upstream.
        assert_relative_eq!(t[(1, 2)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(t[(2, 2)], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn params_apply_offset() {
        let link = DhParams::new(0.0, 0.0, 0.0, FRAC_PI_2);
        let t = link.transform(-FRAC_PI_2);
        assert_relative_eq!(t, Matrix4::identity(), epsilon = 1e-12);
    }

    #[test]
    fn limits_contain_and_clamp() {
        let limits = JointLimits::new(-1.0, 1.0, 3.14, 5.0);
        assert!(limits.contains(0.5));
        assert!(!limits.contains(1.5));
        assert_relative_eq!(limits.clamp(1.5), 1.0);
        assert_relative_eq!(limits.clamp(-2.0), -1.0);
    }
}
