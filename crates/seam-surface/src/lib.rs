//! Volumetric surface reconstruction for scanned weld workpieces.
//!
//! This crate turns an oriented point cloud into a triangle mesh:
//!
//! 1. **Indicator field** - signed-projection splatting of oriented points
//!    onto a regular grid over the expanded bounding box
//! 2. **Isosurface extraction** - marching cubes with the canonical
//!    256-entry tables, shared edge vertices, gradient normals
//! 3. **Density filtering** - drop hallucinated geometry from sparsely
//!    supported cells
//! 4. **Decimation** - quadric-error edge collapse toward a target triangle
//!    budget
//!
//! # Example
//!
//! ```
//! use seam_surface::{reconstruct_surface, remove_low_density, decimate, ReconstructionParams};
//! use seam_types::PointCloud;
//! use nalgebra::{Point3, Vector3};
//!
//! let mut cloud = PointCloud::new();
//! let center = Point3::new(0.5, 0.5, 0.5);
//! for i in 0..8u32 {
//!     let corner = Point3::new(
//!         (i & 1) as f32,
//!         ((i >> 1) & 1) as f32,
//!         ((i >> 2) & 1) as f32,
//!     );
//!     cloud.push_with_normal(corner, (corner - center).normalize());
//! }
//!
//! let params = ReconstructionParams::new().with_depth(6).with_scale(1.2);
//! let result = reconstruct_surface(&cloud, &params).unwrap();
//! let filtered = remove_low_density(&result.mesh, 0.1);
//! let simplified = decimate(&filtered, 0.5);
//! assert!(simplified.mesh.indices_valid());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::many_single_char_names)]

pub mod decimate;
pub mod density;
pub mod error;
pub mod grid;
pub mod marching;
pub mod quadric;
pub mod reconstruct;
pub mod tables;

pub use decimate::{decimate, DecimationOutcome};
pub use density::remove_low_density;
pub use error::{SurfaceError, SurfaceResult};
pub use grid::IndicatorGrid;
pub use marching::extract_isosurface;
pub use quadric::Quadric;
pub use reconstruct::{reconstruct_surface, Reconstruction, ReconstructionParams};
