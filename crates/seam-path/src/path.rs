//! Weld-path construction.

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};
use tracing::debug;

use seam_types::{WeldMesh, WeldPoint};

use crate::error::{PathError, PathResult};
use crate::params::PathParams;

/// An ordered sequence of oriented weld points plus traversal parameters.
///
/// Invariants: `arc_length` starts at zero and never decreases; normals and
/// tangents are unit length wherever the inputs permit.
///
/// # Example
///
/// ```
/// use seam_path::{PathParams, WeldPath};
/// use nalgebra::{Point3, Vector3};
///
/// let positions: Vec<_> = (0..10)
///     .map(|i| Point3::new(i as f32 * 0.01, 0.0, 0.0))
///     .collect();
/// let normals = vec![Vector3::z(); 10];
///
/// let path = WeldPath::from_points(&positions, &normals, PathParams::default()).unwrap();
/// assert_eq!(path.len(), 10);
/// assert!((path.total_length() - 0.09).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct WeldPath {
    points: Vec<WeldPoint>,
    params: PathParams,
}

impl WeldPath {
    /// Builds a path from sampled positions and surface normals.
    ///
    /// Tangents are central differences of the positions (one-sided at the
    /// ends); arc length is the cumulative chord length; normals are
    /// re-normalized.
    ///
    /// # Errors
    ///
    /// Returns an error when the inputs are empty or differ in length.
    pub fn from_points(
        positions: &[Point3<f32>],
        normals: &[Vector3<f32>],
        params: PathParams,
    ) -> PathResult<Self> {
        if positions.is_empty() {
            return Err(PathError::InsufficientPoints {
                required: 1,
                actual: 0,
            });
        }
        if positions.len() != normals.len() {
            return Err(PathError::MismatchedInputs {
                positions: positions.len(),
                normals: normals.len(),
            });
        }

        let mut points = Vec::with_capacity(positions.len());
        let mut arc = 0.0f32;

        for (i, (&position, normal)) in positions.iter().zip(normals.iter()).enumerate() {
            if i > 0 {
                arc += (position - positions[i - 1]).norm();
            }

            points.push(WeldPoint::new(
                position,
                unit_or(normal, Vector3::z),
                secant_tangent(positions, i),
                arc,
            ));
        }

        Ok(Self { points, params })
    }

    /// Builds a path along the longest boundary polyline of a mesh.
    ///
    /// Boundary edges (edges with exactly one incident triangle) are chained
    /// into polylines; the longest one, open or closed, becomes the weld
    /// curve. Vertex normals come from the mesh.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::NoBoundary`] for meshes without boundary edges
    /// (closed surfaces) and propagates construction errors.
    pub fn from_mesh_boundary(mesh: &WeldMesh, params: PathParams) -> PathResult<Self> {
        let chain = longest_boundary_chain(mesh)?;

        debug!(vertices = chain.len(), "traced boundary polyline");

        let positions: Vec<Point3<f32>> = chain
            .iter()
            .map(|&v| mesh.positions[v as usize])
            .collect();
        let normals: Vec<Vector3<f32>> = chain
            .iter()
            .map(|&v| {
                mesh.normals
                    .get(v as usize)
                    .copied()
                    .unwrap_or_else(Vector3::z)
            })
            .collect();

        Self::from_points(&positions, &normals, params)
    }

    /// The weld points in traversal order.
    #[must_use]
    pub fn points(&self) -> &[WeldPoint] {
        &self.points
    }

    /// Mutable access for the modulation passes in this crate.
    pub(crate) fn points_mut(&mut self) -> &mut Vec<WeldPoint> {
        &mut self.points
    }

    /// The traversal parameters.
    #[must_use]
    pub const fn params(&self) -> &PathParams {
        &self.params
    }

    /// Number of weld points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true when the path has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total arc length of the path.
    #[must_use]
    pub fn total_length(&self) -> f32 {
        self.points.last().map_or(0.0, |p| p.arc_length)
    }

    /// Recomputes arc lengths from the current positions.
    pub(crate) fn recompute_arc_lengths(&mut self) {
        let mut arc = 0.0f32;
        for i in 0..self.points.len() {
            if i > 0 {
                arc += (self.points[i].position - self.points[i - 1].position).norm();
            }
            self.points[i].arc_length = arc;
        }
    }

    /// Recomputes tangents as central differences of the current positions.
    pub(crate) fn recompute_tangents(&mut self) {
        let positions: Vec<Point3<f32>> = self.points.iter().map(|p| p.position).collect();
        for (i, point) in self.points.iter_mut().enumerate() {
            point.tangent = secant_tangent(&positions, i);
        }
    }
}

/// Normalized central-difference tangent at index `i` (one-sided at the
/// ends, +x for a single point).
fn secant_tangent(positions: &[Point3<f32>], i: usize) -> Vector3<f32> {
    if positions.len() < 2 {
        return Vector3::x();
    }
    let next = (i + 1).min(positions.len() - 1);
    let prev = i.saturating_sub(1);
    unit_or(&(positions[next] - positions[prev]), Vector3::x)
}

/// Normalizes a vector, substituting `fallback()` below 1e-6.
fn unit_or(v: &Vector3<f32>, fallback: fn() -> Vector3<f32>) -> Vector3<f32> {
    let norm = v.norm();
    if norm > 1e-6 {
        v / norm
    } else {
        fallback()
    }
}

/// Finds the longest chain of boundary edges in the mesh, as vertex indices.
fn longest_boundary_chain(mesh: &WeldMesh) -> PathResult<Vec<u32>> {
    // Count incident triangles per undirected edge.
    let mut edge_count: HashMap<(u32, u32), u32> = HashMap::new();
    for t in &mesh.triangles {
        for i in 0..3 {
            let a = t[i];
            let b = t[(i + 1) % 3];
            let edge = if a < b { (a, b) } else { (b, a) };
            *edge_count.entry(edge).or_insert(0) += 1;
        }
    }

    let mut adjacency: HashMap<u32, Vec<u32>> = HashMap::new();
    for (&(a, b), &count) in &edge_count {
        if count == 1 {
            adjacency.entry(a).or_default().push(b);
            adjacency.entry(b).or_default().push(a);
        }
    }

    if adjacency.is_empty() {
        return Err(PathError::NoBoundary);
    }

    // Deterministic walk order regardless of hash state.
    for neighbors in adjacency.values_mut() {
        neighbors.sort_unstable();
    }
    let mut starts: Vec<u32> = adjacency.keys().copied().collect();
    starts.sort_unstable_by_key(|v| {
        // Open chains first (degree-1 endpoints), then by index.
        (adjacency[v].len() != 1, *v)
    });

    let mut visited: std::collections::HashSet<(u32, u32)> = std::collections::HashSet::new();
    let mut best: Vec<u32> = Vec::new();

    for &start in &starts {
        let mut chain = vec![start];
        let mut current = start;

        loop {
            let Some(neighbors) = adjacency.get(&current) else {
                break;
            };
            let next = neighbors.iter().copied().find(|&n| {
                let edge = if current < n { (current, n) } else { (n, current) };
                !visited.contains(&edge)
            });

            match next {
                Some(n) => {
                    let edge = if current < n { (current, n) } else { (n, current) };
                    visited.insert(edge);
                    if n == start {
                        break; // closed loop
                    }
                    chain.push(n);
                    current = n;
                }
                None => break,
            }
        }

        if chain.len() > best.len() {
            best = chain;
        }
    }

    if best.len() < 2 {
        return Err(PathError::NoBoundary);
    }

    Ok(best)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn straight_path(n: usize) -> WeldPath {
        let positions: Vec<_> = (0..n)
            .map(|i| Point3::new(i as f32 * 0.01, 0.0, 0.0))
            .collect();
        let normals = vec![Vector3::z(); n];
        WeldPath::from_points(&positions, &normals, PathParams::default()).unwrap()
    }

    #[test]
    fn from_points_basic() {
        let path = straight_path(10);

        assert_eq!(path.len(), 10);
        assert_relative_eq!(path.points()[0].arc_length, 0.0);
        assert_relative_eq!(path.total_length(), 0.09, epsilon = 1e-6);

        for wp in path.points() {
            assert_relative_eq!(wp.normal.norm(), 1.0, epsilon = 1e-6);
            assert_relative_eq!(wp.tangent.norm(), 1.0, epsilon = 1e-6);
            assert_relative_eq!(wp.tangent.x, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn arc_lengths_never_decrease() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.1, 0.0, 0.0),
            Point3::new(0.1, 0.2, 0.0),
            Point3::new(0.1, 0.2, 0.0), // repeated point: zero-length chord
            Point3::new(0.3, 0.2, 0.0),
        ];
        let normals = vec![Vector3::z(); positions.len()];
        let path = WeldPath::from_points(&positions, &normals, PathParams::default()).unwrap();

        for pair in path.points().windows(2) {
            assert!(pair[1].arc_length >= pair[0].arc_length);
        }
    }

    #[test]
    fn empty_input_rejected() {
        let result = WeldPath::from_points(&[], &[], PathParams::default());
        assert!(matches!(result, Err(PathError::InsufficientPoints { .. })));
    }

    #[test]
    fn mismatched_inputs_rejected() {
        let positions = vec![Point3::origin(); 3];
        let normals = vec![Vector3::z(); 2];
        let result = WeldPath::from_points(&positions, &normals, PathParams::default());
        assert!(matches!(result, Err(PathError::MismatchedInputs { .. })));
    }

    #[test]
    fn unnormalized_normals_are_fixed() {
        let positions = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        let normals = vec![Vector3::new(0.0, 0.0, 5.0), Vector3::zeros()];
        let path = WeldPath::from_points(&positions, &normals, PathParams::default()).unwrap();

        assert_relative_eq!(path.points()[0].normal.z, 1.0, epsilon = 1e-6);
        // Zero normal falls back to +z.
        assert_relative_eq!(path.points()[1].normal.z, 1.0, epsilon = 1e-6);
    }

    /// A single quad (two triangles) whose boundary is a 4-vertex loop.
    fn quad_mesh() -> WeldMesh {
        let mut mesh = WeldMesh::new();
        mesh.positions.push(Point3::new(0.0, 0.0, 0.0));
        mesh.positions.push(Point3::new(1.0, 0.0, 0.0));
        mesh.positions.push(Point3::new(1.0, 1.0, 0.0));
        mesh.positions.push(Point3::new(0.0, 1.0, 0.0));
        for _ in 0..4 {
            mesh.normals.push(Vector3::z());
        }
        mesh.triangles.push([0, 1, 2]);
        mesh.triangles.push([0, 2, 3]);
        mesh
    }

    #[test]
    fn boundary_of_quad() {
        let path = WeldPath::from_mesh_boundary(&quad_mesh(), PathParams::default()).unwrap();

        // The boundary loop visits all four corners.
        assert_eq!(path.len(), 4);
        assert!(path.total_length() > 2.9);
        for wp in path.points() {
            assert_relative_eq!(wp.normal.z, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn closed_mesh_has_no_boundary() {
        // A tetrahedron is closed: every edge has two incident triangles.
        let mut mesh = WeldMesh::new();
        mesh.positions.push(Point3::new(0.0, 0.0, 0.0));
        mesh.positions.push(Point3::new(1.0, 0.0, 0.0));
        mesh.positions.push(Point3::new(0.0, 1.0, 0.0));
        mesh.positions.push(Point3::new(0.0, 0.0, 1.0));
        for _ in 0..4 {
            mesh.normals.push(Vector3::z());
        }
        mesh.triangles.push([0, 1, 2]);
        mesh.triangles.push([0, 1, 3]);
        mesh.triangles.push([0, 2, 3]);
        mesh.triangles.push([1, 2, 3]);

        let result = WeldPath::from_mesh_boundary(&mesh, PathParams::default());
        assert!(matches!(result, Err(PathError::NoBoundary)));
    }

    #[test]
    fn open_strip_boundary_is_longest_chain() {
        // Two triangles sharing one edge: the boundary is a single open
        // loop through all four vertices.
        let path = WeldPath::from_mesh_boundary(&quad_mesh(), PathParams::default()).unwrap();
        let first = path.points()[0].position;
        let last = path.points()[path.len() - 1].position;
        // Loop does not repeat the starting vertex.
        assert!((first - last).norm() > 0.5);
    }
}
