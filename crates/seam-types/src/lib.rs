//! Core data types for the seamforge weld-planning pipeline.
//!
//! This crate holds the plain data structures shared by every stage of the
//! pipeline:
//!
//! - **Point Cloud** - scanned points with optional normals and colors
//! - **Weld Mesh** - indexed triangle mesh with per-vertex normals and
//!   reconstruction densities
//! - **Weld Point** - an oriented sample on a weld path
//! - **Bounds** - axis-aligned bounding boxes
//!
//! # Example
//!
//! ```
//! use seam_types::PointCloud;
//! use nalgebra::{Point3, Vector3};
//!
//! let mut cloud = PointCloud::new();
//! cloud.push_with_normal(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0));
//! cloud.push_with_normal(Point3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0));
//!
//! assert_eq!(cloud.len(), 2);
//! assert!(cloud.has_normals());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

pub mod bounds;
pub mod cloud;
pub mod mesh;
pub mod weld;

pub use bounds::Aabb;
pub use cloud::{CloudPoint, PointCloud, PointColor};
pub use mesh::WeldMesh;
pub use weld::WeldPoint;

/// Version string reported by the pipeline.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string() {
        assert_eq!(VERSION, "1.0.0");
    }
}
