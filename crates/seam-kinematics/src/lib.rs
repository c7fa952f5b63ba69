//! Six-axis serial-arm kinematics.
//!
//! This crate models the welding robot as a six-joint serial chain in
//! Denavit-Hartenberg parameters and provides:
//!
//! - **Forward kinematics** - tool pose from joint angles
//! - **Geometric Jacobian** - differential kinematics and manipulability
//! - **Inverse kinematics** - damped-least-squares iteration, from a caller
//!   seed or from a fixed panel of seeds
//! - **Joint limits** - checks and clamping
//! - **Presets** - UR5, UR10, KUKA KR6 R700, Doosan M1013
//!
//! # Example
//!
//! ```
//! use seam_kinematics::{IkSettings, RobotModel, RobotType};
//!
//! let robot = RobotModel::new(RobotType::Ur5);
//! let joints = [0.3, -1.0, 1.2, -0.4, 0.5, -0.2];
//!
//! // Round-trip: FK then IK from the same seed recovers the pose.
//! let target = robot.forward_kinematics(&joints);
//! let solved = robot.solve_nearest(&target, &joints, &IkSettings::default()).unwrap();
//! assert!(robot.within_limits(&solved));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]

pub mod dh;
pub mod error;
pub mod ik;
pub mod presets;
pub mod robot;

pub use dh::{dh_transform, DhParams, JointLimits};
pub use error::{KinematicsError, KinematicsResult};
pub use ik::{IkSettings, SEED_PANEL};
pub use presets::RobotType;
pub use robot::RobotModel;
