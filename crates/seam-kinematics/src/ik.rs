//! Damped-least-squares inverse kinematics.
//!
//! Each iteration forms the pose residual `e = (p* − p, w · e_rot)` and
//! takes the damped Jacobian-transpose step
//!
//! ```text
//! θ ← clamp(θ + λ · Jᵀ · e)
//! ```
//!
//! The damping factor λ keeps steps bounded near singular configurations.
//! The rotation residual is the axis-angle form `½ Σ rᵢ × rᵢ*` over the
//! rotation columns, which vanishes exactly when the orientations agree.
//!
//! The step is a scaled gradient of `½‖e‖²`, so the iteration closes poses
//! whose seed already sits at the target within tolerance and otherwise
//! reports failure after the budget. Callers keep seeds close: the panel in
//! [`SEED_PANEL`] covers standard postures, and path conversion carries the
//! previous step's solution forward.

use nalgebra::{Matrix3, Matrix4, Vector3, Vector6};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::error::{KinematicsError, KinematicsResult};
use crate::robot::RobotModel;

/// Weight of the rotation residual relative to the position residual.
const ROTATION_WEIGHT: f64 = 0.1;

/// Joint-space distance below which two IK solutions count as duplicates.
const DUPLICATE_THRESHOLD: f64 = 0.1;

/// Fixed panel of seed configurations tried by [`RobotModel::solve_all`].
pub const SEED_PANEL: [[f64; 6]; 8] = [
    [0.0, -FRAC_PI_2, FRAC_PI_2, 0.0, 0.0, 0.0],
    [0.0, -FRAC_PI_4, FRAC_PI_4, 0.0, 0.0, 0.0],
    [FRAC_PI_2, -FRAC_PI_2, FRAC_PI_2, 0.0, 0.0, 0.0],
    [-FRAC_PI_2, -FRAC_PI_2, FRAC_PI_2, 0.0, 0.0, 0.0],
    [0.0, -FRAC_PI_2, FRAC_PI_2, PI, 0.0, 0.0],
    [0.0, -3.0 * FRAC_PI_4, 3.0 * FRAC_PI_4, 0.0, 0.0, 0.0],
    [PI, -FRAC_PI_2, FRAC_PI_2, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
];

/// Convergence parameters for the damped-least-squares iteration.
#[derive(Debug, Clone, Copy)]
pub struct IkSettings {
    /// Iteration budget per seed. Default: 100.
    pub max_iterations: usize,

    /// Residual norm below which the solve counts as converged.
    /// Default: 1e-6.
    pub tolerance: f64,

    /// Damping factor λ scaling the Jacobian-transpose step. Default: 0.01.
    pub damping: f64,
}

impl Default for IkSettings {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-6,
            damping: 0.01,
        }
    }
}

impl RobotModel {
    /// Solves IK from the caller's seed, returning the configuration the
    /// iteration converged to.
    ///
    /// The result is continuous with the seed: of the many configurations
    /// reaching the target, the iteration lands on one near the seed, which
    /// is what path tracking wants.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::NoSolution`] when the iteration does not
    /// converge within the budget.
    ///
    /// # Example
    ///
    /// ```
    /// use seam_kinematics::{IkSettings, RobotModel, RobotType};
    ///
    /// let robot = RobotModel::new(RobotType::Ur5);
    /// let joints = [0.3, -1.0, 1.2, -0.4, 0.5, -0.2];
    /// let target = robot.forward_kinematics(&joints);
    ///
    /// let solved = robot
    ///     .solve_nearest(&target, &joints, &IkSettings::default())
    ///     .unwrap();
    /// for (a, b) in solved.iter().zip(joints.iter()) {
    ///     assert!((a - b).abs() < 1e-3);
    /// }
    /// ```
    pub fn solve_nearest(
        &self,
        target: &Matrix4<f64>,
        seed: &[f64; 6],
        settings: &IkSettings,
    ) -> KinematicsResult<[f64; 6]> {
        self.damped_ls(target, seed, settings)
            .ok_or(KinematicsError::NoSolution)
    }

    /// Runs the solver from the fixed seed panel and returns every distinct
    /// in-limits solution, at most one per seed.
    ///
    /// Solutions closer than 0.1 rad in joint space are deduplicated.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::NoSolution`] when no seed converges.
    pub fn solve_all(
        &self,
        target: &Matrix4<f64>,
        settings: &IkSettings,
    ) -> KinematicsResult<Vec<[f64; 6]>> {
        let mut solutions: Vec<[f64; 6]> = Vec::new();

        for seed in &SEED_PANEL {
            if solutions.len() >= SEED_PANEL.len() {
                break;
            }
            let Some(candidate) = self.damped_ls(target, seed, settings) else {
                continue;
            };

            let duplicate = solutions.iter().any(|s| {
                let d2: f64 = s
                    .iter()
                    .zip(candidate.iter())
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum();
                d2 < DUPLICATE_THRESHOLD * DUPLICATE_THRESHOLD
            });

            if !duplicate {
                solutions.push(candidate);
            }
        }

        if solutions.is_empty() {
            Err(KinematicsError::NoSolution)
        } else {
            Ok(solutions)
        }
    }

    /// One damped-least-squares run; `None` when the residual does not drop
    /// below tolerance within the iteration budget.
    fn damped_ls(
        &self,
        target: &Matrix4<f64>,
        seed: &[f64; 6],
        settings: &IkSettings,
    ) -> Option<[f64; 6]> {
        let mut joints = *seed;
        self.clamp_to_limits(&mut joints);

        let tol2 = settings.tolerance * settings.tolerance;

        for _ in 0..settings.max_iterations {
            let current = self.forward_kinematics(&joints);
            let residual = pose_residual(target, &current);

            if residual.norm_squared() < tol2 {
                return Some(joints);
            }

            let step = self.jacobian(&joints).transpose() * residual * settings.damping;

            for (angle, delta) in joints.iter_mut().zip(step.iter()) {
                *angle += delta;
            }
            self.clamp_to_limits(&mut joints);
        }

        None
    }
}

/// Weighted pose residual `(p* − p, w · e_rot)` between target and current.
fn pose_residual(target: &Matrix4<f64>, current: &Matrix4<f64>) -> Vector6<f64> {
    let p_target = target.fixed_view::<3, 1>(0, 3);
    let p_current = current.fixed_view::<3, 1>(0, 3);
    let dp = p_target - p_current;

    let r_target: Matrix3<f64> = target.fixed_view::<3, 3>(0, 0).into_owned();
    let r_current: Matrix3<f64> = current.fixed_view::<3, 3>(0, 0).into_owned();
    let e_rot = rotation_residual(&r_current, &r_target);

    Vector6::new(
        dp.x,
        dp.y,
        dp.z,
        ROTATION_WEIGHT * e_rot.x,
        ROTATION_WEIGHT * e_rot.y,
        ROTATION_WEIGHT * e_rot.z,
    )
}

/// Axis-angle orientation error `½ Σ rᵢ × rᵢ*`, zero exactly when the
/// rotations agree.
fn rotation_residual(current: &Matrix3<f64>, target: &Matrix3<f64>) -> Vector3<f64> {
    let mut e = Vector3::zeros();
    for col in 0..3 {
        let rc: Vector3<f64> = current.column(col).into_owned();
        let rt: Vector3<f64> = target.column(col).into_owned();
        e += rc.cross(&rt);
    }
    e * 0.5
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::presets::RobotType;
    use approx::assert_relative_eq;

    fn ur5() -> RobotModel {
        RobotModel::new(RobotType::Ur5)
    }

    fn position_error(robot: &RobotModel, joints: &[f64; 6], target: &Matrix4<f64>) -> f64 {
        let fk = robot.forward_kinematics(joints);
        let dp = fk.fixed_view::<3, 1>(0, 3) - target.fixed_view::<3, 1>(0, 3);
        dp.norm()
    }

    #[test]
    fn rotation_residual_vanishes_iff_equal() {
        let r = nalgebra::Rotation3::from_euler_angles(0.3, -0.2, 0.9);
        let e = rotation_residual(r.matrix(), r.matrix());
        assert_relative_eq!(e.norm(), 0.0, epsilon = 1e-12);

        let other = nalgebra::Rotation3::from_euler_angles(0.3, -0.2, 1.0);
        let e = rotation_residual(r.matrix(), other.matrix());
        assert!(e.norm() > 1e-3);
    }

    #[test]
    fn exact_seed_is_a_fixed_point() {
        let robot = ur5();
        let joints = [0.3, -1.0, 1.2, -0.4, 0.5, -0.2];
        let target = robot.forward_kinematics(&joints);

        let solved = robot
            .solve_nearest(&target, &joints, &IkSettings::default())
            .unwrap();

        for (a, b) in solved.iter().zip(joints.iter()) {
            assert!((a - b).abs() < 1e-3, "{solved:?} vs {joints:?}");
        }
    }

    #[test]
    fn distant_seed_fails_within_budget() {
        // The damped gradient step cannot cross a 0.3 rad gap in 100
        // iterations; the solver must report that instead of looping.
        let robot = ur5();
        let joints = [0.3, -1.0, 1.2, -0.4, 0.5, -0.2];
        let target = robot.forward_kinematics(&joints);

        let seed = [0.6, -1.3, 0.9, -0.1, 0.8, -0.5];
        let result = robot.solve_nearest(&target, &seed, &IkSettings::default());
        assert!(matches!(result, Err(KinematicsError::NoSolution)));
    }

    #[test]
    fn solution_respects_fk_consistency() {
        let robot = ur5();
        let joints = [0.5, -1.2, 0.9, -0.3, 0.8, 0.4];
        let target = robot.forward_kinematics(&joints);

        let solved = robot
            .solve_nearest(&target, &joints, &IkSettings::default())
            .unwrap();

        assert!(position_error(&robot, &solved, &target) < 1e-3);

        let fk = robot.forward_kinematics(&solved);
        let mut column_error: f64 = 0.0;
        for col in 0..3 {
            for row in 0..3 {
                column_error += (fk[(row, col)] - target[(row, col)]).abs();
            }
        }
        assert!(column_error < 0.05, "rotation drifted: {column_error}");
    }

    #[test]
    fn unreachable_target_fails() {
        let robot = ur5();
        let mut target = Matrix4::identity();
        target[(0, 3)] = 10.0;

        let result = robot.solve_nearest(&target, &SEED_PANEL[0], &IkSettings::default());
        assert!(matches!(result, Err(KinematicsError::NoSolution)));

        let result = robot.solve_all(&target, &IkSettings::default());
        assert!(matches!(result, Err(KinematicsError::NoSolution)));
    }

    #[test]
    fn panel_finds_solutions_within_limits() {
        // A target on one of the panel postures is found by that seed.
        let robot = ur5();
        let target = robot.forward_kinematics(&SEED_PANEL[2]);

        let solutions = robot.solve_all(&target, &IkSettings::default()).unwrap();

        assert!(!solutions.is_empty());
        assert!(solutions.len() <= SEED_PANEL.len());
        for s in &solutions {
            assert!(robot.within_limits(s));
            assert!(position_error(&robot, s, &target) < 1e-3);
        }
    }

    #[test]
    fn solutions_are_distinct() {
        let robot = ur5();
        let target = robot.forward_kinematics(&SEED_PANEL[5]);

        let solutions = robot.solve_all(&target, &IkSettings::default()).unwrap();

        for (i, a) in solutions.iter().enumerate() {
            for b in solutions.iter().skip(i + 1) {
                let d2: f64 = a
                    .iter()
                    .zip(b.iter())
                    .map(|(x, y)| (x - y) * (x - y))
                    .sum();
                assert!(d2.sqrt() >= DUPLICATE_THRESHOLD);
            }
        }
    }

    #[test]
    fn settings_default() {
        let s = IkSettings::default();
        assert_eq!(s.max_iterations, 100);
        assert_relative_eq!(s.tolerance, 1e-6);
        assert_relative_eq!(s.damping, 0.01);
    }

    #[test]
    fn seed_panel_values() {
        assert_relative_eq!(SEED_PANEL[0][1], -FRAC_PI_2);
        assert_relative_eq!(SEED_PANEL[4][3], PI);
        assert_relative_eq!(SEED_PANEL[7][0], 0.0);
    }
}
