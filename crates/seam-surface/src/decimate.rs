//! Mesh decimation by quadric-error edge collapse.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use nalgebra::{Point3, Vector3};
use tracing::{debug, info};

use seam_types::WeldMesh;

use crate::quadric::Quadric;

/// An edge-collapse candidate in the priority queue.
#[derive(Debug, Clone)]
struct EdgeCollapse {
    v1: u32,
    v2: u32,
    cost: f64,
    merged: Point3<f64>,
}

impl PartialEq for EdgeCollapse {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}

impl Eq for EdgeCollapse {}

impl PartialOrd for EdgeCollapse {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EdgeCollapse {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the binary heap pops the cheapest collapse first.
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
    }
}

/// Result of a decimation pass.
#[derive(Debug, Clone)]
pub struct DecimationOutcome {
    /// The decimated mesh.
    pub mesh: WeldMesh,

    /// Triangle count before decimation.
    pub original_triangles: usize,

    /// Triangle count after decimation.
    pub final_triangles: usize,

    /// Edge collapses applied.
    pub collapses_performed: usize,

    /// Candidates rejected to protect topology.
    pub collapses_rejected: usize,
}

impl std::fmt::Display for DecimationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Decimation: {} -> {} triangles ({} collapses, {} rejected)",
            self.original_triangles,
            self.final_triangles,
            self.collapses_performed,
            self.collapses_rejected
        )
    }
}

/// Reduces the triangle count toward `target_ratio` of the input.
///
/// Edges are collapsed cheapest-first by quadric error until at most
/// `⌈ratio · T⌉` triangles remain; collapses that would pinch the surface
/// into non-manifold geometry are rejected. A no-op (clone of the input)
/// when `target_ratio` is outside `(0, 1)`.
///
/// # Example
///
/// ```
/// use seam_surface::decimate;
/// use seam_types::WeldMesh;
/// use nalgebra::{Point3, Vector3};
///
/// // A small fan of triangles.
/// let mut mesh = WeldMesh::new();
/// mesh.positions.push(Point3::origin());
/// mesh.normals.push(Vector3::z());
/// for i in 0..7 {
///     let a = i as f32 * 0.9;
///     mesh.positions.push(Point3::new(a.cos(), a.sin(), 0.0));
///     mesh.normals.push(Vector3::z());
/// }
/// for i in 1..7 {
///     mesh.triangles.push([0, i, i + 1]);
/// }
///
/// let out = decimate(&mesh, 0.5);
/// assert!(out.mesh.triangle_count() <= mesh.triangle_count());
/// ```
#[must_use]
pub fn decimate(mesh: &WeldMesh, target_ratio: f32) -> DecimationOutcome {
    let original_triangles = mesh.triangle_count();

    if target_ratio <= 0.0 || target_ratio >= 1.0 || original_triangles == 0 {
        return DecimationOutcome {
            mesh: mesh.clone(),
            original_triangles,
            final_triangles: original_triangles,
            collapses_performed: 0,
            collapses_rejected: 0,
        };
    }

    let target = ((original_triangles as f64) * f64::from(target_ratio)).ceil() as usize;
    if original_triangles <= target {
        return DecimationOutcome {
            mesh: mesh.clone(),
            original_triangles,
            final_triangles: original_triangles,
            collapses_performed: 0,
            collapses_rejected: 0,
        };
    }

    info!(original = original_triangles, target, "decimating mesh");

    let has_densities = mesh.has_densities();

    // Working copies; a vertex slot becomes None once merged away.
    let mut positions: Vec<Option<Point3<f64>>> = mesh
        .positions
        .iter()
        .map(|p| Some(p.cast::<f64>()))
        .collect();
    let mut normals: Vec<Vector3<f64>> = mesh.normals.iter().map(|n| n.cast::<f64>()).collect();
    let mut densities: Vec<f32> = if has_densities {
        mesh.densities.clone()
    } else {
        Vec::new()
    };
    let mut faces: Vec<Option<[u32; 3]>> = mesh.triangles.iter().copied().map(Some).collect();
    let mut active_faces = original_triangles;

    let mut quadrics = vertex_quadrics(mesh);
    let mut heap = initial_queue(mesh, &quadrics);
    let mut remap: HashMap<u32, u32> = HashMap::new();

    let mut collapses_performed = 0;
    let mut collapses_rejected = 0;

    while active_faces > target {
        let Some(collapse) = heap.pop() else {
            break;
        };

        let v1 = resolve(collapse.v1, &remap);
        let v2 = resolve(collapse.v2, &remap);

        if v1 == v2 || positions[v1 as usize].is_none() || positions[v2 as usize].is_none() {
            continue;
        }

        if !collapse_keeps_manifold(&positions, &faces, v1, v2) {
            collapses_rejected += 1;
            continue;
        }

        // Merge v2 into v1 at the optimal position.
        positions[v1 as usize] = Some(collapse.merged);
        let blended = normals[v1 as usize] + normals[v2 as usize];
        normals[v1 as usize] = if blended.norm() > 1e-12 {
            blended.normalize()
        } else {
            normals[v1 as usize]
        };
        if has_densities {
            densities[v1 as usize] =
                f32::midpoint(densities[v1 as usize], densities[v2 as usize]);
        }

        let q2 = quadrics[v2 as usize];
        quadrics[v1 as usize].add(&q2);

        positions[v2 as usize] = None;
        remap.insert(v2, v1);

        for face_opt in &mut faces {
            if let Some(face) = face_opt {
                for idx in face.iter_mut() {
                    *idx = resolve(*idx, &remap);
                }
                if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
                    *face_opt = None;
                    active_faces -= 1;
                }
            }
        }

        collapses_performed += 1;

        requeue_edges(v1, &positions, &faces, &quadrics, &mut heap);
    }

    let final_mesh = compact(&positions, &normals, &densities, &faces, has_densities);

    debug!(
        vertices = final_mesh.vertex_count(),
        triangles = final_mesh.triangle_count(),
        "decimation complete"
    );

    DecimationOutcome {
        mesh: final_mesh,
        original_triangles,
        final_triangles: active_faces,
        collapses_performed,
        collapses_rejected,
    }
}

fn resolve(mut v: u32, remap: &HashMap<u32, u32>) -> u32 {
    while let Some(&next) = remap.get(&v) {
        v = next;
    }
    v
}

const fn ordered_edge(v1: u32, v2: u32) -> (u32, u32) {
    if v1 < v2 {
        (v1, v2)
    } else {
        (v2, v1)
    }
}

fn vertex_quadrics(mesh: &WeldMesh) -> Vec<Quadric> {
    let mut quadrics = vec![Quadric::default(); mesh.vertex_count()];

    for face in &mesh.triangles {
        let a = mesh.positions[face[0] as usize].cast::<f64>();
        let b = mesh.positions[face[1] as usize].cast::<f64>();
        let c = mesh.positions[face[2] as usize].cast::<f64>();

        if let Some(q) = Quadric::from_triangle(&a, &b, &c) {
            for &vi in face {
                quadrics[vi as usize].add(&q);
            }
        }
    }

    quadrics
}

fn candidate(
    v1: u32,
    v2: u32,
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    quadrics: &[Quadric],
) -> EdgeCollapse {
    let mut combined = quadrics[v1 as usize];
    combined.add(&quadrics[v2 as usize]);

    let midpoint = Point3::from((p1.coords + p2.coords) * 0.5);
    let merged = combined.minimizer().unwrap_or(midpoint);
    let cost = combined.evaluate(&merged);

    EdgeCollapse {
        v1,
        v2,
        cost,
        merged,
    }
}

fn initial_queue(mesh: &WeldMesh, quadrics: &[Quadric]) -> BinaryHeap<EdgeCollapse> {
    let mut heap = BinaryHeap::new();
    let mut seen = HashSet::new();

    for face in &mesh.triangles {
        for i in 0..3 {
            let v1 = face[i];
            let v2 = face[(i + 1) % 3];
            let edge = ordered_edge(v1, v2);
            if !seen.insert(edge) {
                continue;
            }

            let p1 = mesh.positions[v1 as usize].cast::<f64>();
            let p2 = mesh.positions[v2 as usize].cast::<f64>();
            heap.push(candidate(v1, v2, &p1, &p2, quadrics));
        }
    }

    heap
}

/// A collapse is manifold-safe when the endpoints share at most two other
/// vertices (the apexes of the edge's incident triangles).
fn collapse_keeps_manifold(
    positions: &[Option<Point3<f64>>],
    faces: &[Option<[u32; 3]>],
    v1: u32,
    v2: u32,
) -> bool {
    let mut n1: HashSet<u32> = HashSet::new();
    let mut n2: HashSet<u32> = HashSet::new();

    for face in faces.iter().flatten() {
        let has_v1 = face.contains(&v1);
        let has_v2 = face.contains(&v2);

        for &vi in face {
            if vi == v1 || vi == v2 || positions[vi as usize].is_none() {
                continue;
            }
            if has_v1 {
                n1.insert(vi);
            }
            if has_v2 {
                n2.insert(vi);
            }
        }
    }

    n1.intersection(&n2).count() <= 2
}

fn requeue_edges(
    v1: u32,
    positions: &[Option<Point3<f64>>],
    faces: &[Option<[u32; 3]>],
    quadrics: &[Quadric],
    heap: &mut BinaryHeap<EdgeCollapse>,
) {
    let Some(p1) = positions[v1 as usize] else {
        return;
    };

    let mut neighbors: HashSet<u32> = HashSet::new();
    for face in faces.iter().flatten() {
        if face.contains(&v1) {
            for &vi in face {
                if vi != v1 && positions[vi as usize].is_some() {
                    neighbors.insert(vi);
                }
            }
        }
    }

    for &v2 in &neighbors {
        if let Some(p2) = positions[v2 as usize] {
            heap.push(candidate(v1, v2, &p1, &p2, quadrics));
        }
    }
}

fn compact(
    positions: &[Option<Point3<f64>>],
    normals: &[Vector3<f64>],
    densities: &[f32],
    faces: &[Option<[u32; 3]>],
    has_densities: bool,
) -> WeldMesh {
    let mut remap: HashMap<u32, u32> = HashMap::new();
    let mut mesh = WeldMesh::new();

    for (old_idx, position) in positions.iter().enumerate() {
        if let Some(p) = position {
            remap.insert(old_idx as u32, mesh.positions.len() as u32);
            mesh.positions
                .push(Point3::new(p.x as f32, p.y as f32, p.z as f32));
            let n = normals[old_idx];
            mesh.normals
                .push(Vector3::new(n.x as f32, n.y as f32, n.z as f32));
            if has_densities {
                mesh.densities.push(densities[old_idx]);
            }
        }
    }

    for face in faces.iter().flatten() {
        if let (Some(&a), Some(&b), Some(&c)) = (
            remap.get(&face[0]),
            remap.get(&face[1]),
            remap.get(&face[2]),
        ) {
            mesh.triangles.push([a, b, c]);
        }
    }

    mesh
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    /// A closed octahedron: 6 vertices, 8 triangles.
    fn octahedron() -> WeldMesh {
        let mut mesh = WeldMesh::new();
        let verts = [
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, -1.0),
        ];
        for v in verts {
            mesh.normals.push(v.coords.cast::<f32>().normalize());
            mesh.positions.push(v.cast::<f32>());
        }
        mesh.triangles.extend_from_slice(&[
            [0, 2, 4],
            [2, 1, 4],
            [1, 3, 4],
            [3, 0, 4],
            [2, 0, 5],
            [1, 2, 5],
            [3, 1, 5],
            [0, 3, 5],
        ]);
        mesh
    }

    /// A dense planar grid mesh.
    fn grid_mesh(n: u32) -> WeldMesh {
        let mut mesh = WeldMesh::new();
        for j in 0..=n {
            for i in 0..=n {
                mesh.positions
                    .push(Point3::new(i as f32, j as f32, 0.0));
                mesh.normals.push(Vector3::z());
            }
        }
        for j in 0..n {
            for i in 0..n {
                let a = j * (n + 1) + i;
                let b = a + 1;
                let c = a + n + 1;
                let d = c + 1;
                mesh.triangles.push([a, b, c]);
                mesh.triangles.push([b, d, c]);
            }
        }
        mesh
    }

    #[test]
    fn out_of_range_ratio_is_noop() {
        let mesh = octahedron();
        for ratio in [0.0, -1.0, 1.0, 2.0] {
            let out = decimate(&mesh, ratio);
            assert_eq!(out.final_triangles, 8);
            assert_eq!(out.collapses_performed, 0);
        }
    }

    #[test]
    fn empty_mesh_is_noop() {
        let out = decimate(&WeldMesh::new(), 0.5);
        assert_eq!(out.original_triangles, 0);
        assert_eq!(out.final_triangles, 0);
    }

    #[test]
    fn reduces_toward_target() {
        let mesh = grid_mesh(8); // 128 triangles
        let out = decimate(&mesh, 0.5);

        assert!(out.final_triangles < mesh.triangle_count());
        assert!(out.collapses_performed > 0);
        assert!(out.mesh.indices_valid());
        assert_eq!(out.mesh.triangle_count(), out.final_triangles);
    }

    #[test]
    fn planar_mesh_stays_planar() {
        let mesh = grid_mesh(6);
        let out = decimate(&mesh, 0.3);

        for p in &out.mesh.positions {
            assert!(p.z.abs() < 1e-4, "vertex {p:?} left the plane");
        }
    }

    #[test]
    fn normals_stay_unit() {
        let mesh = grid_mesh(6);
        let out = decimate(&mesh, 0.4);

        for n in &out.mesh.normals {
            assert!((n.norm() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn densities_survive() {
        let mut mesh = grid_mesh(4);
        mesh.densities = vec![1.0; mesh.vertex_count()];

        let out = decimate(&mesh, 0.5);
        assert!(out.mesh.has_densities());
    }

    #[test]
    fn display_format() {
        let out = decimate(&grid_mesh(4), 0.5);
        let text = format!("{out}");
        assert!(text.contains("Decimation"));
    }
}
