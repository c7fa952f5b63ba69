//! Geometry file I/O for the weld-planning pipeline.
//!
//! ASCII readers and writers for the formats the pipeline exchanges with
//! scanners and host software:
//!
//! - **PLY** - point clouds in (positions, optional normals and colors),
//!   meshes in and out
//! - **PCD** - point clouds in (`POINTS N` / `DATA ascii`)
//! - **OBJ** - meshes out (`v`, `vn`, `f v//n ...`)
//!
//! # Example
//!
//! ```no_run
//! use seam_io::{load_cloud_ply, save_mesh_obj, save_mesh_ply};
//! use seam_types::WeldMesh;
//!
//! let cloud = load_cloud_ply("scan.ply").unwrap();
//! println!("{} points", cloud.len());
//!
//! let mesh = WeldMesh::new(); // reconstructed elsewhere
//! save_mesh_ply(&mesh, "surface.ply").unwrap();
//! save_mesh_obj(&mesh, "surface.obj").unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod obj;
pub mod pcd;
pub mod ply;

pub use error::{IoError, IoResult};
pub use obj::save_mesh_obj;
pub use pcd::load_cloud_pcd;
pub use ply::{load_cloud_ply, load_mesh_ply, save_mesh_ply};
