//! Low-density vertex removal.
//!
//! Vertices produced from sparsely supported grid cells are usually
//! hallucinated geometry. This pass drops every vertex whose density falls
//! below a quantile of the density distribution, along with any triangle
//! that references one.

use seam_types::WeldMesh;
use tracing::debug;

/// Removes vertices whose density lies below the `quantile` threshold.
///
/// A no-op (clone of the input) when `quantile` is outside `(0, 1)` or the
/// mesh carries no densities. The surviving vertex set is reindexed
/// compactly and every remaining triangle refers to it.
///
/// # Example
///
/// ```
/// use seam_surface::remove_low_density;
/// use seam_types::WeldMesh;
/// use nalgebra::{Point3, Vector3};
///
/// let mut mesh = WeldMesh::new();
/// for i in 0..4 {
///     mesh.positions.push(Point3::new(i as f32, 0.0, 0.0));
///     mesh.normals.push(Vector3::z());
/// }
/// mesh.densities = vec![1.0, 1.0, 1.0, 0.01];
/// mesh.triangles.push([0, 1, 2]);
/// mesh.triangles.push([1, 2, 3]);
///
/// let filtered = remove_low_density(&mesh, 0.25);
/// assert_eq!(filtered.vertex_count(), 3);
/// assert_eq!(filtered.triangle_count(), 1);
/// ```
#[must_use]
pub fn remove_low_density(mesh: &WeldMesh, quantile: f32) -> WeldMesh {
    if quantile <= 0.0 || quantile >= 1.0 || !mesh.has_densities() {
        return mesh.clone();
    }

    let mut sorted = mesh.densities.clone();
    sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let threshold_idx = ((sorted.len() as f32 * quantile) as usize).min(sorted.len() - 1);
    let threshold = sorted[threshold_idx];

    let mut remap: Vec<Option<u32>> = vec![None; mesh.vertex_count()];
    let mut filtered = WeldMesh::new();

    for (i, &density) in mesh.densities.iter().enumerate() {
        if density >= threshold {
            remap[i] = Some(filtered.positions.len() as u32);
            filtered.positions.push(mesh.positions[i]);
            filtered.normals.push(mesh.normals[i]);
            filtered.densities.push(density);
        }
    }

    for t in &mesh.triangles {
        if let (Some(a), Some(b), Some(c)) = (
            remap[t[0] as usize],
            remap[t[1] as usize],
            remap[t[2] as usize],
        ) {
            filtered.triangles.push([a, b, c]);
        }
    }

    debug!(
        before = mesh.vertex_count(),
        after = filtered.vertex_count(),
        threshold,
        "removed low-density vertices"
    );

    filtered
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};

    fn mesh_with_densities(densities: &[f32]) -> WeldMesh {
        let mut mesh = WeldMesh::new();
        for (i, &d) in densities.iter().enumerate() {
            mesh.positions.push(Point3::new(i as f32, 0.0, 0.0));
            mesh.normals.push(Vector3::z());
            mesh.densities.push(d);
        }
        for i in 0..densities.len().saturating_sub(2) {
            mesh.triangles
                .push([i as u32, i as u32 + 1, i as u32 + 2]);
        }
        mesh
    }

    #[test]
    fn quantile_out_of_range_is_noop() {
        let mesh = mesh_with_densities(&[1.0, 2.0, 3.0, 0.1]);
        for q in [0.0, -0.5, 1.0, 1.5] {
            let out = remove_low_density(&mesh, q);
            assert_eq!(out.vertex_count(), mesh.vertex_count());
            assert_eq!(out.triangle_count(), mesh.triangle_count());
        }
    }

    #[test]
    fn no_densities_is_noop() {
        let mut mesh = mesh_with_densities(&[1.0, 2.0, 3.0]);
        mesh.densities.clear();
        let out = remove_low_density(&mesh, 0.5);
        assert_eq!(out.vertex_count(), 3);
    }

    #[test]
    fn drops_sparse_vertices_and_their_triangles() {
        let mesh = mesh_with_densities(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.01]);
        let out = remove_low_density(&mesh, 0.125);

        assert_eq!(out.vertex_count(), 7);
        assert!(out.indices_valid());
        // Triangles touching the dropped last vertex are gone.
        assert!(out.triangle_count() < mesh.triangle_count());
    }

    #[test]
    fn surviving_mesh_is_compact() {
        let mesh = mesh_with_densities(&[0.01, 1.0, 1.0, 1.0, 1.0]);
        let out = remove_low_density(&mesh, 0.2);

        assert_eq!(out.vertex_count(), 4);
        assert_eq!(out.densities.len(), 4);
        assert!(out.indices_valid());
    }

    #[test]
    fn empty_mesh() {
        let out = remove_low_density(&WeldMesh::new(), 0.5);
        assert!(out.is_empty());
    }
}
