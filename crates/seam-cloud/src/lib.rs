//! Point-cloud processing for the weld-planning pipeline.
//!
//! This crate cleans and enriches raw scan data before surface
//! reconstruction:
//!
//! - **Normal estimation** - PCA over k-nearest or radius neighborhoods
//! - **Normal orientation** - toward a viewpoint, outward from the centroid,
//!   or propagated consistently across the cloud
//! - **Voxel downsampling** - one centroid point per occupied cube
//! - **Statistical outlier removal** - drop points whose neighborhoods are
//!   anomalously sparse
//!
//! # Example
//!
//! ```
//! use seam_cloud::{estimate_normals_knn, orient_normals_toward};
//! use seam_types::PointCloud;
//! use nalgebra::Point3;
//!
//! // A small planar patch.
//! let positions: Vec<_> = (0..25)
//!     .map(|i| {
//!         let (row, col) = (i / 5, i % 5);
//!         Point3::new(row as f32 * 0.1, col as f32 * 0.1, 0.0)
//!     })
//!     .collect();
//! let mut cloud = PointCloud::from_positions(&positions);
//!
//! estimate_normals_knn(&mut cloud, 8).unwrap();
//! orient_normals_toward(&mut cloud, Point3::new(0.0, 0.0, 10.0)).unwrap();
//!
//! assert!(cloud.has_normals());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

pub mod downsample;
pub mod error;
pub mod normals;
pub mod outlier;

pub use downsample::downsample_voxel;
pub use error::{CloudError, CloudResult};
pub use normals::{
    estimate_normals_knn, estimate_normals_radius, orient_normals_consistent,
    orient_normals_outward, orient_normals_toward,
};
pub use outlier::{remove_outliers_with_result, remove_statistical_outliers, OutlierParams,
    OutlierRemoval};
