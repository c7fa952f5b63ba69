//! Shipped robot models.
//!
//! DH parameters and joint limits for the four supported arms, in meters
//! and radians.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::dh::{DhParams, JointLimits};

/// The supported robot models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotType {
    /// Universal Robots UR5.
    Ur5,
    /// Universal Robots UR10.
    Ur10,
    /// KUKA KR6 R700.
    KukaKr6R700,
    /// Doosan M1013.
    DoosanM1013,
    /// Caller-supplied DH table and limits.
    Custom,
}

const UR5_DH: [DhParams; 6] = [
    DhParams::new(0.0, -FRAC_PI_2, 0.089159, 0.0),
    DhParams::new(-0.425, 0.0, 0.0, 0.0),
    DhParams::new(-0.39225, 0.0, 0.0, 0.0),
    DhParams::new(0.0, -FRAC_PI_2, 0.10915, 0.0),
    DhParams::new(0.0, FRAC_PI_2, 0.09465, 0.0),
    DhParams::new(0.0, 0.0, 0.0823, 0.0),
];

const UR5_LIMITS: [JointLimits; 6] = [
    JointLimits::new(-2.0 * PI, 2.0 * PI, 3.14, 5.0),
    JointLimits::new(-2.0 * PI, 2.0 * PI, 3.14, 5.0),
    JointLimits::new(-2.0 * PI, 2.0 * PI, 3.14, 5.0),
    JointLimits::new(-2.0 * PI, 2.0 * PI, 6.28, 5.0),
    JointLimits::new(-2.0 * PI, 2.0 * PI, 6.28, 5.0),
    JointLimits::new(-2.0 * PI, 2.0 * PI, 6.28, 5.0),
];

const UR10_DH: [DhParams; 6] = [
    DhParams::new(0.0, -FRAC_PI_2, 0.1273, 0.0),
    DhParams::new(-0.612, 0.0, 0.0, 0.0),
    DhParams::new(-0.5723, 0.0, 0.0, 0.0),
    DhParams::new(0.0, -FRAC_PI_2, 0.163941, 0.0),
    DhParams::new(0.0, FRAC_PI_2, 0.1157, 0.0),
    DhParams::new(0.0, 0.0, 0.0922, 0.0),
];

const UR10_LIMITS: [JointLimits; 6] = [
    JointLimits::new(-2.0 * PI, 2.0 * PI, 2.09, 5.0),
    JointLimits::new(-2.0 * PI, 2.0 * PI, 2.09, 5.0),
    JointLimits::new(-2.0 * PI, 2.0 * PI, 3.14, 5.0),
    JointLimits::new(-2.0 * PI, 2.0 * PI, 3.14, 5.0),
    JointLimits::new(-2.0 * PI, 2.0 * PI, 3.14, 5.0),
    JointLimits::new(-2.0 * PI, 2.0 * PI, 3.14, 5.0),
];

const KUKA_KR6_DH: [DhParams; 6] = [
    DhParams::new(0.025, -FRAC_PI_2, 0.400, 0.0),
    DhParams::new(0.315, 0.0, 0.0, 0.0),
    DhParams::new(0.035, -FRAC_PI_2, 0.0, 0.0),
    DhParams::new(0.0, FRAC_PI_2, 0.365, 0.0),
    DhParams::new(0.0, -FRAC_PI_2, 0.0, 0.0),
    DhParams::new(0.0, 0.0, 0.080, 0.0),
];

const KUKA_KR6_LIMITS: [JointLimits; 6] = [
    JointLimits::new(-2.967, 2.967, 6.54, 10.0),
    JointLimits::new(-2.094, 2.443, 6.28, 10.0),
    JointLimits::new(-2.356, 2.094, 6.54, 10.0),
    JointLimits::new(-3.490, 3.490, 7.85, 10.0),
    JointLimits::new(-2.094, 2.094, 7.85, 10.0),
    JointLimits::new(-6.109, 6.109, 12.04, 10.0),
];

const DOOSAN_M1013_DH: [DhParams; 6] = [
    DhParams::new(0.0, -FRAC_PI_2, 0.1555, 0.0),
    DhParams::new(-0.550, 0.0, 0.0, 0.0),
    DhParams::new(0.0, -FRAC_PI_2, 0.0, 0.0),
    DhParams::new(0.0, FRAC_PI_2, 0.546, 0.0),
    DhParams::new(0.0, -FRAC_PI_2, 0.0, 0.0),
    DhParams::new(0.0, 0.0, 0.110, 0.0),
];

const DOOSAN_M1013_LIMITS: [JointLimits; 6] = [
    JointLimits::new(-6.283, 6.283, 2.09, 5.0),
    JointLimits::new(-6.283, 6.283, 2.09, 5.0),
    JointLimits::new(-2.618, 2.618, 2.97, 5.0),
    JointLimits::new(-6.283, 6.283, 3.93, 5.0),
    JointLimits::new(-6.283, 6.283, 3.93, 5.0),
    JointLimits::new(-6.283, 6.283, 5.93, 5.0),
];

/// The shipped DH table and limits for a preset type.
///
/// `Custom` falls back to the UR5 tables; construct custom robots through
/// [`crate::RobotModel::custom`] instead.
#[must_use]
pub fn preset_tables(robot: RobotType) -> ([DhParams; 6], [JointLimits; 6]) {
    match robot {
        RobotType::Ur10 => (UR10_DH, UR10_LIMITS),
        RobotType::KukaKr6R700 => (KUKA_KR6_DH, KUKA_KR6_LIMITS),
        RobotType::DoosanM1013 => (DOOSAN_M1013_DH, DOOSAN_M1013_LIMITS),
        RobotType::Ur5 | RobotType::Custom => (UR5_DH, UR5_LIMITS),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ur5_geometry() {
        let (dh, limits) = preset_tables(RobotType::Ur5);
        assert_relative_eq!(dh[0].d, 0.089159);
        assert_relative_eq!(dh[1].a, -0.425);
        assert_relative_eq!(dh[5].d, 0.0823);
        assert_relative_eq!(limits[0].max_velocity, 3.14);
    }

    #[test]
    fn ur10_is_larger_than_ur5() {
        let (ur5, _) = preset_tables(RobotType::Ur5);
        let (ur10, _) = preset_tables(RobotType::Ur10);
        assert!(ur10[1].a.abs() > ur5[1].a.abs());
        assert!(ur10[2].a.abs() > ur5[2].a.abs());
    }

    #[test]
    fn kuka_has_asymmetric_limits() {
        let (_, limits) = preset_tables(RobotType::KukaKr6R700);
        assert_relative_eq!(limits[1].min_angle, -2.094);
        assert_relative_eq!(limits[1].max_angle, 2.443);
    }

    #[test]
    fn doosan_offsets() {
        let (dh, _) = preset_tables(RobotType::DoosanM1013);
        assert_relative_eq!(dh[3].d, 0.546);
        assert_relative_eq!(dh[5].d, 0.110);
    }

    #[test]
    fn all_presets_have_sane_limits() {
        for robot in [
            RobotType::Ur5,
            RobotType::Ur10,
            RobotType::KukaKr6R700,
            RobotType::DoosanM1013,
        ] {
            let (_, limits) = preset_tables(robot);
            for l in limits {
                assert!(l.min_angle < l.max_angle);
                assert!(l.max_velocity > 0.0);
                assert!(l.max_acceleration > 0.0);
            }
        }
    }
}
