//! Path-to-joint-space conversion.

use nalgebra::{Matrix4, Vector3};
use std::f64::consts::FRAC_PI_2;
use tracing::{debug, info};

use seam_kinematics::{IkSettings, RobotModel};
use seam_types::WeldPoint;

use crate::path::WeldPath;

/// Seed configuration for the first path point.
pub const START_SEED: [f64; 6] = [0.0, -FRAC_PI_2, FRAC_PI_2, 0.0, 0.0, 0.0];

/// Joint-space trace of a weld path.
///
/// `joints` and `reachable` are parallel to the path points. An unreachable
/// step records all-zero joints; no continuity is guaranteed across
/// unreachable gaps.
#[derive(Debug, Clone, Default)]
pub struct JointTrajectory {
    /// Six joint angles per path point.
    pub joints: Vec<[f64; 6]>,

    /// Whether the solver reached each path point.
    pub reachable: Vec<bool>,
}

impl JointTrajectory {
    /// Number of trajectory steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Returns true when the trajectory has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Number of reachable steps.
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.reachable.iter().filter(|&&r| r).count()
    }

    /// Returns true when every step is reachable.
    #[must_use]
    pub fn is_fully_reachable(&self) -> bool {
        !self.is_empty() && self.reachable.iter().all(|&r| r)
    }
}

impl std::fmt::Display for JointTrajectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Trajectory: {}/{} steps reachable",
            self.reachable_count(),
            self.len()
        )
    }
}

impl WeldPath {
    /// Converts the path into a joint trajectory for `robot`.
    ///
    /// For each weld point a tool target is built with the z axis pointing
    /// into the surface, the x axis along the travel direction, and the
    /// origin lifted off the surface by `standoff` along the normal. The
    /// solver is seeded with the previous step's solution so consecutive
    /// steps stay on the same arm configuration; a failed step records
    /// zeros, is flagged unreachable, and does not advance the seed.
    #[must_use]
    pub fn to_joint_trajectory(&self, robot: &RobotModel, standoff: f32) -> JointTrajectory {
        let settings = IkSettings::default();
        let mut trajectory = JointTrajectory {
            joints: Vec::with_capacity(self.len()),
            reachable: Vec::with_capacity(self.len()),
        };

        info!(points = self.len(), "converting path to joint space");

        let mut seed = START_SEED;
        for wp in self.points() {
            let target = tool_target(wp, standoff);

            match robot.solve_nearest(&target, &seed, &settings) {
                Ok(solution) => {
                    seed = solution;
                    trajectory.joints.push(solution);
                    trajectory.reachable.push(true);
                }
                Err(_) => {
                    trajectory.joints.push([0.0; 6]);
                    trajectory.reachable.push(false);
                }
            }
        }

        debug!(
            reachable = trajectory.reachable_count(),
            total = trajectory.len(),
            "trajectory conversion finished"
        );

        trajectory
    }
}

/// Tool pose for one weld point: z into the surface, x along travel,
/// origin standoff above the surface.
fn tool_target(wp: &WeldPoint, standoff: f32) -> Matrix4<f64> {
    let n = wp.normal.cast::<f64>();
    let z = -n;
    let x = wp.tangent.cast::<f64>();

    let mut y = z.cross(&x);
    let y_norm = y.norm();
    if y_norm > 1e-6 {
        y /= y_norm;
    } else {
        // Tangent parallel to the normal; pick any perpendicular.
        let pick = if z.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        y = z.cross(&pick).normalize();
    }
    let x = y.cross(&z);

    let origin = wp.position.cast::<f64>() - n * f64::from(standoff);

    let mut target = Matrix4::identity();
    for row in 0..3 {
        target[(row, 0)] = x[row];
        target[(row, 1)] = y[row];
        target[(row, 2)] = z[row];
        target[(row, 3)] = origin[row];
    }
    target
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::params::PathParams;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use seam_kinematics::RobotType;

    /// The surface point whose tool target is exactly the UR5 pose at the
    /// start seed.
    ///
    /// At the start seed the tool z axis is world +y. With surface normal
    /// -y, the target origin `p - standoff*n` lands on the seed pose when
    /// the seam point sits standoff below it along -y.
    fn seed_surface_point(standoff: f32) -> Point3<f32> {
        let robot = RobotModel::new(RobotType::Ur5);
        let tool = robot.forward_kinematics(&START_SEED);

        Point3::new(
            tool[(0, 3)] as f32,
            tool[(1, 3)] as f32 - standoff,
            tool[(2, 3)] as f32,
        )
    }

    /// A dwell seam: every weld point sits at the seed surface point.
    fn dwell_path(standoff: f32, count: usize) -> WeldPath {
        let positions = vec![seed_surface_point(standoff); count];
        let normals = vec![Vector3::new(0.0, -1.0, 0.0); count];
        WeldPath::from_points(&positions, &normals, PathParams::default()).unwrap()
    }

    #[test]
    fn tool_target_frame_is_orthonormal() {
        let wp = WeldPoint::new(
            Point3::new(0.1, 0.2, 0.3),
            Vector3::z(),
            Vector3::x(),
            0.0,
        );
        let t = tool_target(&wp, 0.015);

        let r = t.fixed_view::<3, 3>(0, 0);
        let identity = r * r.transpose();
        assert_relative_eq!(identity, nalgebra::Matrix3::identity(), epsilon = 1e-9);

        // z into the surface, origin lifted along the normal.
        assert_relative_eq!(t[(2, 2)], -1.0, epsilon = 1e-9);
        assert_relative_eq!(t[(2, 3)], 0.3 - 0.015, epsilon = 1e-6);
    }

    #[test]
    fn degenerate_tangent_still_builds_a_frame() {
        let wp = WeldPoint::new(Point3::origin(), Vector3::z(), Vector3::z(), 0.0);
        let t = tool_target(&wp, 0.0);

        let r = t.fixed_view::<3, 3>(0, 0);
        assert_relative_eq!(
            r * r.transpose(),
            nalgebra::Matrix3::identity(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn dwell_seam_at_the_seed_pose_is_fully_reachable() {
        let standoff = 0.015;
        let robot = RobotModel::new(RobotType::Ur5);
        let path = dwell_path(standoff, 8);

        let trajectory = path.to_joint_trajectory(&robot, standoff);

        assert_eq!(trajectory.len(), path.len());
        assert!(
            trajectory.is_fully_reachable(),
            "only {}/{} reachable",
            trajectory.reachable_count(),
            trajectory.len()
        );

        // Every solution must put the tool at its target, and identical
        // targets keep the arm still.
        for (wp, joints) in path.points().iter().zip(trajectory.joints.iter()) {
            assert!(robot.within_limits(joints));
            let fk = robot.forward_kinematics(joints);
            let target = tool_target(wp, standoff);
            for row in 0..3 {
                assert_relative_eq!(fk[(row, 3)], target[(row, 3)], epsilon = 1e-3);
            }
        }
        for pair in trajectory.joints.windows(2) {
            for (a, b) in pair[0].iter().zip(pair[1].iter()) {
                assert_relative_eq!(a, b, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn failed_step_does_not_advance_the_seed() {
        let standoff = 0.015;
        let robot = RobotModel::new(RobotType::Ur5);
        let anchor = seed_surface_point(standoff);

        // An off-surface bump in the middle of the seam. The doubled anchor
        // points keep the secant tangents of the endpoints clean, so the
        // first and last targets stay on the seed pose while every point
        // near the bump is unreachable.
        let bump = anchor + Vector3::new(0.0, -0.2, 0.0);
        let positions = vec![anchor, anchor, bump, anchor, anchor];
        let normals = vec![Vector3::new(0.0, -1.0, 0.0); 5];
        let path = WeldPath::from_points(&positions, &normals, PathParams::default()).unwrap();

        let trajectory = path.to_joint_trajectory(&robot, standoff);

        assert!(trajectory.reachable[0]);
        assert!(!trajectory.reachable[2]);
        assert_eq!(trajectory.joints[2], [0.0; 6]);

        // The failure left the seed at the step-0 solution, so the final
        // anchor point solves again to the same configuration.
        assert!(trajectory.reachable[4]);
        for (a, b) in trajectory.joints[0].iter().zip(trajectory.joints[4].iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn unreachable_seam_records_zeros() {
        let positions: Vec<_> = (0..5)
            .map(|i| Point3::new(10.0 + i as f32 * 0.005, 0.0, 0.0))
            .collect();
        let normals = vec![Vector3::z(); 5];
        let path = WeldPath::from_points(&positions, &normals, PathParams::default()).unwrap();

        let robot = RobotModel::new(RobotType::Ur5);
        let trajectory = path.to_joint_trajectory(&robot, 0.015);

        assert_eq!(trajectory.reachable_count(), 0);
        assert!(!trajectory.is_fully_reachable());
        for joints in &trajectory.joints {
            assert_eq!(*joints, [0.0; 6]);
        }
    }

    #[test]
    fn empty_path_yields_empty_trajectory() {
        let trajectory = JointTrajectory::default();
        assert!(trajectory.is_empty());
        assert!(!trajectory.is_fully_reachable());
        assert_eq!(format!("{trajectory}"), "Trajectory: 0/0 steps reachable");
    }
}
