//! Normal estimation and orientation.
//!
//! Normals are estimated with PCA: for each point, the covariance of its
//! neighborhood is decomposed and the eigenvector of the smallest eigenvalue
//! is taken as the surface normal. The neighborhood is either the k nearest
//! other points or every other point within a radius.
//!
//! Estimation leaves normal signs arbitrary; one of the orientation passes
//! below should follow.

use nalgebra::{Matrix3, Point3, SymmetricEigen, Vector3};
use rayon::prelude::*;

use seam_spatial::PointSet;
use seam_types::PointCloud;

use crate::error::{CloudError, CloudResult};

/// Neighbor count used when a radius neighborhood is too small for PCA.
const RADIUS_FALLBACK_K: usize = 20;

/// Estimates normals for every point using PCA over its `k` nearest
/// neighbors.
///
/// The neighborhood of a point consists of the `k` nearest *other* points.
/// When `k` exceeds `len() - 1` the cloud does not have enough neighbors and
/// the call is a no-op: existing normals (or their absence) are left
/// untouched.
///
/// # Errors
///
/// Returns an error if `k` is zero.
///
/// # Example
///
/// ```
/// use seam_cloud::estimate_normals_knn;
/// use seam_types::PointCloud;
/// use nalgebra::Point3;
///
/// let positions: Vec<_> = (0..100)
///     .map(|i| Point3::new((i % 10) as f32 * 0.1, (i / 10) as f32 * 0.1, 0.0))
///     .collect();
/// let mut cloud = PointCloud::from_positions(&positions);
///
/// estimate_normals_knn(&mut cloud, 10).unwrap();
/// assert!(cloud.has_normals());
/// ```
pub fn estimate_normals_knn(cloud: &mut PointCloud, k: usize) -> CloudResult<()> {
    if k == 0 {
        return Err(CloudError::invalid("k must be at least 1"));
    }

    let n = cloud.len();
    if n == 0 || k > n - 1 {
        return Ok(());
    }

    let positions = cloud.positions();
    let set = PointSet::new(&positions);

    let normals: Vec<Vector3<f32>> = positions
        .par_iter()
        .enumerate()
        .map(|(i, p)| {
            let neighbors: Vec<usize> = set
                .nearest(p, k + 1)
                .into_iter()
                .filter(|nb| nb.index != i)
                .take(k)
                .map(|nb| nb.index)
                .collect();
            pca_normal(&positions, &neighbors)
        })
        .collect();

    for (point, normal) in cloud.points.iter_mut().zip(normals) {
        point.normal = Some(normal);
    }

    Ok(())
}

/// Estimates normals using every other point within `radius` of each point.
///
/// Neighborhoods with fewer than three members fall back to the
/// 20-nearest-neighbor estimate for that point.
///
/// # Errors
///
/// Returns an error if `radius` is not positive.
///
/// # Example
///
/// ```
/// use seam_cloud::estimate_normals_radius;
/// use seam_types::PointCloud;
/// use nalgebra::Point3;
///
/// let positions: Vec<_> = (0..100)
///     .map(|i| Point3::new((i % 10) as f32 * 0.1, (i / 10) as f32 * 0.1, 0.0))
///     .collect();
/// let mut cloud = PointCloud::from_positions(&positions);
///
/// estimate_normals_radius(&mut cloud, 0.25).unwrap();
/// assert!(cloud.has_normals());
/// ```
pub fn estimate_normals_radius(cloud: &mut PointCloud, radius: f32) -> CloudResult<()> {
    if radius <= 0.0 {
        return Err(CloudError::invalid("radius must be positive"));
    }

    let n = cloud.len();
    if n == 0 {
        return Ok(());
    }

    let positions = cloud.positions();
    let set = PointSet::new(&positions);
    let fallback_k = RADIUS_FALLBACK_K.min(n.saturating_sub(1));

    let normals: Vec<Vector3<f32>> = positions
        .par_iter()
        .enumerate()
        .map(|(i, p)| {
            let mut neighbors: Vec<usize> = set
                .within_radius(p, f64::from(radius))
                .into_iter()
                .filter(|nb| nb.index != i)
                .map(|nb| nb.index)
                .collect();

            if neighbors.len() < 3 {
                neighbors = set
                    .nearest(p, fallback_k + 1)
                    .into_iter()
                    .filter(|nb| nb.index != i)
                    .take(fallback_k)
                    .map(|nb| nb.index)
                    .collect();
            }

            pca_normal(&positions, &neighbors)
        })
        .collect();

    for (point, normal) in cloud.points.iter_mut().zip(normals) {
        point.normal = Some(normal);
    }

    Ok(())
}

/// Flips every normal that points away from `viewpoint`.
///
/// A normal is flipped when `(viewpoint - p) · n < 0`, aligning all normals
/// toward the scanner position. This is a per-point heuristic, not a
/// surface-consistent propagation.
///
/// # Errors
///
/// Returns an error if the cloud has no normals.
pub fn orient_normals_toward(cloud: &mut PointCloud, viewpoint: Point3<f32>) -> CloudResult<()> {
    if !cloud.has_normals() {
        return Err(CloudError::MissingNormals);
    }

    for point in &mut cloud.points {
        if let Some(normal) = &mut point.normal {
            let toward = viewpoint - point.position;
            if normal.dot(&toward) < 0.0 {
                *normal = -*normal;
            }
        }
    }

    Ok(())
}

/// Flips every normal that points toward the cloud centroid.
///
/// Works well for convex or mostly convex scans.
///
/// # Errors
///
/// Returns an error if the cloud is empty or has no normals.
pub fn orient_normals_outward(cloud: &mut PointCloud) -> CloudResult<()> {
    if !cloud.has_normals() {
        return Err(CloudError::MissingNormals);
    }
    let Some(centroid) = cloud.centroid() else {
        return Err(CloudError::MissingNormals);
    };

    for point in &mut cloud.points {
        if let Some(normal) = &mut point.normal {
            let outward = point.position - centroid;
            if normal.dot(&outward) < 0.0 {
                *normal = -*normal;
            }
        }
    }

    Ok(())
}

/// Orients normals consistently by propagating from a seed point.
///
/// Starts from the highest point of the cloud (with its normal made to point
/// up) and walks the k-nearest-neighbor graph breadth-first, flipping each
/// newly visited normal to agree with its predecessor. Slower than the
/// per-point heuristics but robust on non-convex scans.
///
/// # Errors
///
/// Returns an error if `k` is zero or the cloud has no normals.
pub fn orient_normals_consistent(cloud: &mut PointCloud, k: usize) -> CloudResult<()> {
    if k == 0 {
        return Err(CloudError::invalid("k must be at least 1"));
    }
    if !cloud.has_normals() {
        return Err(CloudError::MissingNormals);
    }

    let positions = cloud.positions();
    let set = PointSet::new(&positions);

    // Seed at the highest z; assume it faces up.
    let Some(seed_idx) = positions
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.z.partial_cmp(&b.z).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
    else {
        return Ok(());
    };

    if let Some(normal) = &mut cloud.points[seed_idx].normal {
        if normal.z < 0.0 {
            *normal = -*normal;
        }
    }

    let mut visited = vec![false; positions.len()];
    let mut queue = std::collections::VecDeque::new();
    visited[seed_idx] = true;
    queue.push_back(seed_idx);

    while let Some(current) = queue.pop_front() {
        let current_normal = cloud.points[current].normal.unwrap_or_else(Vector3::z);

        for nb in set.nearest(&positions[current], k + 1) {
            if nb.index == current || visited[nb.index] {
                continue;
            }
            visited[nb.index] = true;

            if let Some(normal) = &mut cloud.points[nb.index].normal {
                if normal.dot(&current_normal) < 0.0 {
                    *normal = -*normal;
                }
            }

            queue.push_back(nb.index);
        }
    }

    Ok(())
}

/// PCA normal of the given neighborhood: the eigenvector of the smallest
/// eigenvalue of the neighbor covariance, or +z when degenerate.
fn pca_normal(positions: &[Point3<f32>], neighbors: &[usize]) -> Vector3<f32> {
    if neighbors.is_empty() {
        return Vector3::z();
    }

    let mut centroid = Vector3::<f64>::zeros();
    for &idx in neighbors {
        centroid += positions[idx].coords.cast::<f64>();
    }
    centroid /= neighbors.len() as f64;

    let mut cov = Matrix3::<f64>::zeros();
    for &idx in neighbors {
        let diff = positions[idx].coords.cast::<f64>() - centroid;
        cov += diff * diff.transpose();
    }

    // A collapsed neighborhood has no orientation to recover.
    if cov.norm() < 1e-18 {
        return Vector3::z();
    }

    let eigen = SymmetricEigen::new(cov);
    let eigenvalues = eigen.eigenvalues;

    let min_idx = if eigenvalues[0] <= eigenvalues[1] && eigenvalues[0] <= eigenvalues[2] {
        0
    } else if eigenvalues[1] <= eigenvalues[2] {
        1
    } else {
        2
    };

    let normal = eigen.eigenvectors.column(min_idx);
    let norm = normal.norm();
    if norm > 1e-10 {
        Vector3::new(
            (normal[0] / norm) as f32,
            (normal[1] / norm) as f32,
            (normal[2] / norm) as f32,
        )
    } else {
        Vector3::z()
    }
}
