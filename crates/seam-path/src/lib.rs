//! Weld-path planning.
//!
//! This crate turns seam geometry into robot motion:
//!
//! - **Path construction** - from sampled points or from the boundary of a
//!   reconstructed mesh
//! - **Weave modulation** - zigzag, circular, triangle, and figure-eight
//!   patterns
//! - **Resampling and smoothing** - uniform arc-length steps, moving-average
//!   noise suppression
//! - **Trajectory conversion** - per-point tool frames solved to joint
//!   space with seeded, continuity-preserving IK
//!
//! # Example
//!
//! ```
//! use seam_path::{PathParams, WeaveKind, WeldPath};
//! use nalgebra::{Point3, Vector3};
//!
//! let positions: Vec<_> = (0..40)
//!     .map(|i| Point3::new(i as f32 * 0.005, 0.0, 0.0))
//!     .collect();
//! let normals = vec![Vector3::z(); 40];
//!
//! let mut path = WeldPath::from_points(&positions, &normals, PathParams::default()).unwrap();
//! path.apply_weave(WeaveKind::Zigzag, 0.002, 2.0);
//! path.resample(0.002).unwrap();
//! path.smooth(5).unwrap();
//!
//! assert!(path.total_length() > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

pub mod error;
pub mod params;
pub mod path;
pub mod resample;
pub mod smooth;
pub mod trajectory;
pub mod weave;

pub use error::{PathError, PathResult};
pub use params::{PathParams, WeaveKind};
pub use path::WeldPath;
pub use trajectory::{JointTrajectory, START_SEED};
