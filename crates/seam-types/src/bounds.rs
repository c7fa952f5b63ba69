//! Axis-aligned bounding boxes.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in single precision.
///
/// # Example
///
/// ```
/// use seam_types::Aabb;
/// use nalgebra::Point3;
///
/// let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 3.0, 1.0));
/// assert_eq!(aabb.extents().x, 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3<f32>,
    /// Maximum corner.
    pub max: Point3<f32>,
}

impl Aabb {
    /// Creates a bounding box from min and max corners.
    ///
    /// The corners are reordered so that `min <= max` on each axis.
    #[must_use]
    pub fn new(a: Point3<f32>, b: Point3<f32>) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Computes the bounding box of a set of points.
    ///
    /// Returns `None` when the slice is empty.
    #[must_use]
    pub fn from_points(points: &[Point3<f32>]) -> Option<Self> {
        let first = points.first()?;
        let mut min = *first;
        let mut max = *first;

        for p in &points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        Some(Self { min, max })
    }

    /// Returns the center of the box.
    #[must_use]
    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Returns the per-axis extents (`max - min`).
    #[must_use]
    pub fn extents(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Returns the diagonal length of the box.
    #[must_use]
    pub fn diagonal(&self) -> f32 {
        self.extents().norm()
    }

    /// Returns the box scaled uniformly about its center so that each axis
    /// extent becomes `scale` times the original.
    ///
    /// # Example
    ///
    /// ```
    /// use seam_types::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let aabb = Aabb::new(Point3::origin(), Point3::new(2.0, 2.0, 2.0));
    /// let grown = aabb.scaled(1.5);
    /// assert!((grown.extents().x - 3.0).abs() < 1e-6);
    /// assert_eq!(grown.center(), aabb.center());
    /// ```
    #[must_use]
    pub fn scaled(&self, scale: f32) -> Self {
        let center = self.center();
        let half = self.extents() * (scale * 0.5);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Returns true if the point lies inside the box (inclusive).
    #[must_use]
    pub fn contains(&self, p: &Point3<f32>) -> bool {
        p.x >= self.min.x
            && p.y >= self.min.y
            && p.z >= self.min.z
            && p.x <= self.max.x
            && p.y <= self.max.y
            && p.z <= self.max.z
    }
}
