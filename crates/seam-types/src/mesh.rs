//! Indexed triangle mesh produced by surface reconstruction.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bounds::Aabb;

/// An indexed triangle mesh with per-vertex normals and optional
/// reconstruction densities.
///
/// Invariants maintained by every operation in the pipeline:
///
/// - `normals.len() == positions.len()`
/// - every triangle index is in `[0, positions.len())`
/// - when present, `densities.len() == positions.len()` and every density
///   is non-negative
///
/// # Example
///
/// ```
/// use seam_types::WeldMesh;
/// use nalgebra::{Point3, Vector3};
///
/// let mut mesh = WeldMesh::new();
/// mesh.positions.push(Point3::new(0.0, 0.0, 0.0));
/// mesh.positions.push(Point3::new(1.0, 0.0, 0.0));
/// mesh.positions.push(Point3::new(0.0, 1.0, 0.0));
/// for _ in 0..3 {
///     mesh.normals.push(Vector3::z());
/// }
/// mesh.triangles.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.triangle_count(), 1);
/// assert!(mesh.indices_valid());
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WeldMesh {
    /// Vertex positions.
    pub positions: Vec<Point3<f32>>,

    /// Per-vertex unit normals, parallel to `positions`.
    pub normals: Vec<Vector3<f32>>,

    /// Triangle faces as indices into the vertex arrays.
    pub triangles: Vec<[u32; 3]>,

    /// Per-vertex reconstruction density. Empty when the mesh did not come
    /// out of the volumetric reconstructor.
    pub densities: Vec<f32>,
}

impl WeldMesh {
    /// Creates an empty mesh.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            triangles: Vec::new(),
            densities: Vec::new(),
        }
    }

    /// Creates a mesh with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count),
            normals: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
            densities: Vec::new(),
        }
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns true if per-vertex densities are present.
    #[must_use]
    pub fn has_densities(&self) -> bool {
        !self.densities.is_empty() && self.densities.len() == self.positions.len()
    }

    /// Returns true if every triangle index refers to an existing vertex.
    #[must_use]
    pub fn indices_valid(&self) -> bool {
        let n = self.positions.len() as u32;
        self.triangles
            .iter()
            .all(|t| t[0] < n && t[1] < n && t[2] < n)
    }

    /// Returns the axis-aligned bounding box, or `None` for an empty mesh.
    #[must_use]
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.positions)
    }

    /// Returns the area-weighted normal of a triangle, unnormalized.
    ///
    /// Returns `None` when the index is out of range.
    #[must_use]
    pub fn face_normal(&self, triangle: usize) -> Option<Vector3<f32>> {
        let t = self.triangles.get(triangle)?;
        let a = self.positions.get(t[0] as usize)?;
        let b = self.positions.get(t[1] as usize)?;
        let c = self.positions.get(t[2] as usize)?;
        Some((b - a).cross(&(c - a)))
    }
}
