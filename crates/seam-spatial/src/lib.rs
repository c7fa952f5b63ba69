//! Nearest-neighbor and radius queries over static 3D point sets.
//!
//! This crate wraps a KD-tree behind a small, query-only interface. A
//! [`PointSet`] is built once from a slice of positions and then answers
//! "k nearest to q" and "all within radius r of q" queries. Small sets are
//! served by an exact brute-force scan; larger sets go through the KD-tree.
//!
//! Both paths return the same results: true nearest neighbors under
//! Euclidean distance, ordered by distance with ties broken by ascending
//! point index.
//!
//! # Example
//!
//! ```
//! use seam_spatial::PointSet;
//! use nalgebra::Point3;
//!
//! let set = PointSet::new(&[
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(5.0, 0.0, 0.0),
//! ]);
//!
//! let near = set.nearest(&Point3::new(0.1, 0.0, 0.0), 2);
//! assert_eq!(near[0].index, 0);
//! assert_eq!(near[1].index, 1);
//!
//! let close = set.within_radius(&Point3::new(0.0, 0.0, 0.0), 1.5);
//! assert_eq!(close.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]

mod index;

pub use index::{Neighbor, PointSet};
