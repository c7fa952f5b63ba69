//! Statistical outlier removal.
//!
//! For each point the mean distance to its k nearest neighbors is computed;
//! the global mean and standard deviation of those per-point means define a
//! threshold, and points whose neighborhoods are anomalously far away are
//! dropped. Points removed this way are almost always scanner noise.

use rayon::prelude::*;

use seam_spatial::PointSet;
use seam_types::PointCloud;

use crate::error::{CloudError, CloudResult};

/// Parameters for statistical outlier removal.
#[derive(Debug, Clone)]
pub struct OutlierParams {
    /// Number of neighbors to consider. Default: 20.
    pub k_neighbors: usize,

    /// Standard-deviation multiplier for the removal threshold. Points with
    /// mean neighbor distance above `mean + std_ratio * std` are removed.
    /// Default: 2.0.
    pub std_ratio: f64,
}

impl Default for OutlierParams {
    fn default() -> Self {
        Self {
            k_neighbors: 20,
            std_ratio: 2.0,
        }
    }
}

impl OutlierParams {
    /// Creates parameters with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the neighbor count.
    #[must_use]
    pub const fn with_k_neighbors(mut self, k: usize) -> Self {
        self.k_neighbors = k;
        self
    }

    /// Sets the standard-deviation multiplier.
    #[must_use]
    pub const fn with_std_ratio(mut self, ratio: f64) -> Self {
        self.std_ratio = ratio;
        self
    }
}

/// Result of an outlier-removal pass.
#[derive(Debug, Clone)]
pub struct OutlierRemoval {
    /// The filtered cloud.
    pub cloud: PointCloud,

    /// Number of points in the input.
    pub original_count: usize,

    /// Number of points removed.
    pub removed: usize,

    /// Mean-distance threshold that was applied.
    pub threshold: f64,
}

impl std::fmt::Display for OutlierRemoval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Outlier removal: {} -> {} points ({} removed)",
            self.original_count,
            self.cloud.len(),
            self.removed
        )
    }
}

/// Removes statistical outliers, returning the filtered cloud.
///
/// A no-op (clone of the input) when the cloud has `k_neighbors` or fewer
/// points. Normals and colors follow their points.
///
/// # Errors
///
/// Returns an error if `k_neighbors` is zero or `std_ratio` is not positive.
///
/// # Example
///
/// ```
/// use seam_cloud::{remove_statistical_outliers, OutlierParams};
/// use seam_types::PointCloud;
/// use nalgebra::Point3;
///
/// let mut positions: Vec<_> = (0..100)
///     .map(|i| Point3::new((i % 10) as f32 * 0.1, (i / 10) as f32 * 0.1, 0.0))
///     .collect();
/// positions.push(Point3::new(50.0, 50.0, 50.0)); // far-away noise
///
/// let cloud = PointCloud::from_positions(&positions);
/// let filtered = remove_statistical_outliers(&cloud, &OutlierParams::default()).unwrap();
/// assert_eq!(filtered.len(), 100);
/// ```
pub fn remove_statistical_outliers(
    cloud: &PointCloud,
    params: &OutlierParams,
) -> CloudResult<PointCloud> {
    remove_outliers_with_result(cloud, params).map(|r| r.cloud)
}

/// Removes statistical outliers and reports the counts and threshold used.
///
/// # Errors
///
/// Returns an error if `k_neighbors` is zero or `std_ratio` is not positive.
pub fn remove_outliers_with_result(
    cloud: &PointCloud,
    params: &OutlierParams,
) -> CloudResult<OutlierRemoval> {
    if params.k_neighbors == 0 {
        return Err(CloudError::invalid("k_neighbors must be at least 1"));
    }
    if params.std_ratio <= 0.0 {
        return Err(CloudError::invalid("std_ratio must be positive"));
    }

    let original_count = cloud.len();
    if original_count <= params.k_neighbors {
        return Ok(OutlierRemoval {
            cloud: cloud.clone(),
            original_count,
            removed: 0,
            threshold: 0.0,
        });
    }

    let positions = cloud.positions();
    let set = PointSet::new(&positions);
    let k = params.k_neighbors;

    let mean_distances: Vec<f64> = positions
        .par_iter()
        .enumerate()
        .map(|(i, p)| {
            let neighbors = set.nearest(p, k + 1);
            let mut sum = 0.0;
            let mut count = 0usize;
            for nb in &neighbors {
                if nb.index == i {
                    continue;
                }
                sum += nb.distance;
                count += 1;
                if count == k {
                    break;
                }
            }
            if count > 0 {
                sum / count as f64
            } else {
                0.0
            }
        })
        .collect();

    let n = mean_distances.len() as f64;
    let mean = mean_distances.iter().sum::<f64>() / n;
    let variance = mean_distances
        .iter()
        .map(|d| (d - mean) * (d - mean))
        .sum::<f64>()
        / n;
    let threshold = params.std_ratio.mul_add(variance.sqrt(), mean);

    let points = cloud
        .points
        .iter()
        .zip(mean_distances.iter())
        .filter_map(|(p, &d)| (d <= threshold).then_some(*p))
        .collect();

    let filtered = PointCloud { points };
    let removed = original_count - filtered.len();

    Ok(OutlierRemoval {
        cloud: filtered,
        original_count,
        removed,
        threshold,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};

    fn grid_cloud(n: usize) -> PointCloud {
        let positions: Vec<_> = (0..n * n)
            .map(|i| Point3::new((i % n) as f32 * 0.1, (i / n) as f32 * 0.1, 0.0))
            .collect();
        PointCloud::from_positions(&positions)
    }

    #[test]
    fn params_builder() {
        let params = OutlierParams::new().with_k_neighbors(30).with_std_ratio(1.5);
        assert_eq!(params.k_neighbors, 30);
        assert_eq!(params.std_ratio, 1.5);
    }

    #[test]
    fn rejects_bad_params() {
        let cloud = grid_cloud(5);
        assert!(remove_statistical_outliers(
            &cloud,
            &OutlierParams::new().with_k_neighbors(0)
        )
        .is_err());
        assert!(remove_statistical_outliers(
            &cloud,
            &OutlierParams::new().with_std_ratio(0.0)
        )
        .is_err());
    }

    #[test]
    fn small_cloud_is_noop() {
        let cloud = grid_cloud(3); // 9 points
        let params = OutlierParams::new().with_k_neighbors(20);
        let out = remove_outliers_with_result(&cloud, &params).unwrap();

        assert_eq!(out.cloud.len(), cloud.len());
        assert_eq!(out.removed, 0);
    }

    #[test]
    fn removes_isolated_point() {
        let mut cloud = grid_cloud(10);
        cloud.push_coords(50.0, 50.0, 50.0);

        let out = remove_outliers_with_result(&cloud, &OutlierParams::default()).unwrap();
        assert_eq!(out.cloud.len(), 100);
        assert_eq!(out.removed, 1);
        assert!(out.threshold > 0.0);
    }

    #[test]
    fn uniform_cloud_is_untouched() {
        let cloud = grid_cloud(10);
        let out = remove_statistical_outliers(&cloud, &OutlierParams::default()).unwrap();
        assert_eq!(out.len(), cloud.len());
    }

    #[test]
    fn attributes_follow_points() {
        let mut cloud = PointCloud::new();
        for i in 0..30 {
            cloud.push_with_normal(
                Point3::new(i as f32 * 0.1, 0.0, 0.0),
                Vector3::z(),
            );
        }
        cloud.push_with_normal(Point3::new(100.0, 0.0, 0.0), Vector3::z());

        let params = OutlierParams::new().with_k_neighbors(5).with_std_ratio(1.0);
        let out = remove_statistical_outliers(&cloud, &params).unwrap();

        assert!(out.len() < cloud.len());
        assert!(out.has_normals());
    }

    #[test]
    fn display_format() {
        let out = OutlierRemoval {
            cloud: PointCloud::new(),
            original_count: 100,
            removed: 5,
            threshold: 0.5,
        };
        let text = format!("{out}");
        assert!(text.contains("100"));
        assert!(text.contains('5'));
    }
}
