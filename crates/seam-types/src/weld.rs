//! Oriented weld-path samples.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An oriented sample on a weld path.
///
/// Each sample carries the weld position on the surface, the local surface
/// normal, the path tangent, and the arc length from the start of the path.
/// Normals and tangents are unit length; arc lengths start at zero and never
/// decrease along a path.
///
/// The struct is `repr(C)` and tightly packed: three `f32` triples plus one
/// `f32`, 40 bytes.
///
/// # Example
///
/// ```
/// use seam_types::WeldPoint;
/// use nalgebra::{Point3, Vector3};
///
/// let wp = WeldPoint::new(Point3::origin(), Vector3::z(), Vector3::x(), 0.0);
/// assert_eq!(wp.arc_length, 0.0);
/// assert_eq!(std::mem::size_of::<WeldPoint>(), 40);
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WeldPoint {
    /// Position on the surface.
    pub position: Point3<f32>,

    /// Unit surface normal.
    pub normal: Vector3<f32>,

    /// Unit path tangent.
    pub tangent: Vector3<f32>,

    /// Arc length from the start of the path.
    pub arc_length: f32,
}

impl WeldPoint {
    /// Creates a weld point from its components.
    #[must_use]
    pub const fn new(
        position: Point3<f32>,
        normal: Vector3<f32>,
        tangent: Vector3<f32>,
        arc_length: f32,
    ) -> Self {
        Self {
            position,
            normal,
            tangent,
            arc_length,
        }
    }

    /// Returns the lateral direction `tangent × normal`.
    ///
    /// For unit, orthogonal tangent and normal the result is unit length.
    #[must_use]
    pub fn lateral(&self) -> Vector3<f32> {
        self.tangent.cross(&self.normal)
    }
}

impl Default for WeldPoint {
    fn default() -> Self {
        Self::new(Point3::origin(), Vector3::z(), Vector3::x(), 0.0)
    }
}
