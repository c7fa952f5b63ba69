//! Point cloud data structures.
//!
//! A [`PointCloud`] is an ordered collection of scanned points. Each point
//! carries a position and may carry a unit normal and an RGB color. The
//! attribute accessors (`has_normals`, `has_colors`) report true only when
//! every point carries the attribute, so processing stages can rely on the
//! parallel attributes staying consistent.
//!
//! # Example
//!
//! ```
//! use seam_types::{CloudPoint, PointCloud};
//! use nalgebra::Point3;
//!
//! let cloud = PointCloud::from_positions(&[
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//! ]);
//!
//! assert_eq!(cloud.len(), 2);
//! assert!(!cloud.has_normals());
//! ```

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bounds::Aabb;

/// An 8-bit RGB color attached to a scanned point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl PointColor {
    /// Creates a color from 8-bit channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A single point in a point cloud with optional attributes.
///
/// # Example
///
/// ```
/// use seam_types::CloudPoint;
/// use nalgebra::{Point3, Vector3};
///
/// let p = CloudPoint::with_normal(Point3::origin(), Vector3::z());
/// assert!(p.has_normal());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CloudPoint {
    /// The 3D position of the point.
    pub position: Point3<f32>,

    /// Optional unit normal at this point.
    pub normal: Option<Vector3<f32>>,

    /// Optional RGB color.
    pub color: Option<PointColor>,
}

impl CloudPoint {
    /// Creates a point with just a position.
    #[must_use]
    pub const fn new(position: Point3<f32>) -> Self {
        Self {
            position,
            normal: None,
            color: None,
        }
    }

    /// Creates a point from x, y, z coordinates.
    #[must_use]
    pub const fn from_coords(x: f32, y: f32, z: f32) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Creates a point with position and normal.
    #[must_use]
    pub const fn with_normal(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self {
            position,
            normal: Some(normal),
            color: None,
        }
    }

    /// Returns true if this point has a normal.
    #[must_use]
    pub const fn has_normal(&self) -> bool {
        self.normal.is_some()
    }

    /// Returns true if this point has a color.
    #[must_use]
    pub const fn has_color(&self) -> bool {
        self.color.is_some()
    }
}

impl Default for CloudPoint {
    fn default() -> Self {
        Self::new(Point3::origin())
    }
}

/// An ordered collection of scanned 3D points.
///
/// Created empty or from positions; mutated only by the owning processing
/// stage. Dropping the cloud releases all owned storage.
///
/// # Example
///
/// ```
/// use seam_types::PointCloud;
///
/// let mut cloud = PointCloud::new();
/// cloud.push_coords(0.0, 0.0, 0.0);
/// cloud.push_coords(1.0, 0.0, 0.0);
/// assert_eq!(cloud.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointCloud {
    /// The points in this cloud.
    pub points: Vec<CloudPoint>,
}

impl PointCloud {
    /// Creates an empty point cloud.
    #[must_use]
    pub const fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Creates a point cloud with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Creates a point cloud from a slice of positions.
    #[must_use]
    pub fn from_positions(positions: &[Point3<f32>]) -> Self {
        Self {
            points: positions.iter().map(|p| CloudPoint::new(*p)).collect(),
        }
    }

    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the cloud has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns true if every point has a normal.
    #[must_use]
    pub fn has_normals(&self) -> bool {
        !self.points.is_empty() && self.points.iter().all(CloudPoint::has_normal)
    }

    /// Returns true if every point has a color.
    #[must_use]
    pub fn has_colors(&self) -> bool {
        !self.points.is_empty() && self.points.iter().all(CloudPoint::has_color)
    }

    /// Adds a point to the cloud.
    pub fn push(&mut self, point: CloudPoint) {
        self.points.push(point);
    }

    /// Adds a point with the given coordinates.
    pub fn push_coords(&mut self, x: f32, y: f32, z: f32) {
        self.points.push(CloudPoint::from_coords(x, y, z));
    }

    /// Adds a point with position and normal.
    pub fn push_with_normal(&mut self, position: Point3<f32>, normal: Vector3<f32>) {
        self.points.push(CloudPoint::with_normal(position, normal));
    }

    /// Replaces the contents with bare positions, dropping all attributes.
    pub fn set_positions(&mut self, positions: &[Point3<f32>]) {
        self.points.clear();
        self.points
            .extend(positions.iter().map(|p| CloudPoint::new(*p)));
    }

    /// Removes all points.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Returns the positions of all points.
    #[must_use]
    pub fn positions(&self) -> Vec<Point3<f32>> {
        self.points.iter().map(|p| p.position).collect()
    }

    /// Returns the axis-aligned bounding box, or `None` for an empty cloud.
    #[must_use]
    pub fn bounds(&self) -> Option<Aabb> {
        let first = self.points.first()?.position;
        let mut min = first;
        let mut max = first;

        for point in &self.points[1..] {
            let p = point.position;
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        Some(Aabb { min, max })
    }

    /// Returns the centroid, or `None` for an empty cloud.
    #[must_use]
    pub fn centroid(&self) -> Option<Point3<f32>> {
        if self.points.is_empty() {
            return None;
        }

        // Accumulate in f64 so large clouds don't lose precision.
        let mut sum = nalgebra::Vector3::<f64>::zeros();
        for point in &self.points {
            sum += point.position.coords.cast::<f64>();
        }
        let centroid = sum / self.points.len() as f64;

        Some(Point3::new(
            centroid.x as f32,
            centroid.y as f32,
            centroid.z as f32,
        ))
    }
}

impl FromIterator<CloudPoint> for PointCloud {
    fn from_iter<I: IntoIterator<Item = CloudPoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<Point3<f32>> for PointCloud {
    fn from_iter<I: IntoIterator<Item = Point3<f32>>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().map(CloudPoint::new).collect(),
        }
    }
}
