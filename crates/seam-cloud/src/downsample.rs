//! Voxel-grid downsampling.

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};

use seam_types::{CloudPoint, PointCloud, PointColor};

use crate::error::{CloudError, CloudResult};

#[derive(Default)]
struct VoxelAccum {
    position: Vector3<f64>,
    normal: Vector3<f64>,
    color: [u32; 3],
    count: u32,
}

/// Downsamples the cloud on a voxel grid of side `voxel_size`.
///
/// Space is partitioned into axis-aligned cubes keyed by
/// `(⌊x/s⌋, ⌊y/s⌋, ⌊z/s⌋)` and each occupied cube emits one point at the
/// centroid of its members. When the input carries normals the output normal
/// is the normalized sum (falling back to +z for cancelling normals); colors
/// are averaged channel-wise. The order of the output points is unspecified.
///
/// The output never has more points than the input; a voxel larger than the
/// cloud's bounding box yields a single point.
///
/// # Errors
///
/// Returns an error if `voxel_size` is not positive.
///
/// # Example
///
/// ```
/// use seam_cloud::downsample_voxel;
/// use seam_types::PointCloud;
/// use nalgebra::Point3;
///
/// let positions: Vec<_> = (0..100)
///     .map(|i| Point3::new(i as f32 * 0.01, 0.0, 0.0))
///     .collect();
/// let cloud = PointCloud::from_positions(&positions);
///
/// let sparse = downsample_voxel(&cloud, 0.1).unwrap();
/// assert!(sparse.len() < cloud.len());
/// ```
pub fn downsample_voxel(cloud: &PointCloud, voxel_size: f32) -> CloudResult<PointCloud> {
    if voxel_size <= 0.0 {
        return Err(CloudError::invalid("voxel size must be positive"));
    }

    if cloud.is_empty() {
        return Ok(PointCloud::new());
    }

    let has_normals = cloud.has_normals();
    let has_colors = cloud.has_colors();
    let size = f64::from(voxel_size);

    let mut voxels: HashMap<(i64, i64, i64), VoxelAccum> = HashMap::new();

    for point in &cloud.points {
        let p = point.position.coords.cast::<f64>();
        let key = (
            (p.x / size).floor() as i64,
            (p.y / size).floor() as i64,
            (p.z / size).floor() as i64,
        );

        let accum = voxels.entry(key).or_default();
        accum.position += p;
        accum.count += 1;

        if has_normals {
            if let Some(n) = point.normal {
                accum.normal += n.cast::<f64>();
            }
        }
        if has_colors {
            if let Some(c) = point.color {
                accum.color[0] += u32::from(c.r);
                accum.color[1] += u32::from(c.g);
                accum.color[2] += u32::from(c.b);
            }
        }
    }

    let mut result = PointCloud::with_capacity(voxels.len());

    for accum in voxels.into_values() {
        let inv = 1.0 / f64::from(accum.count);
        let centroid = accum.position * inv;

        let mut point = CloudPoint::new(Point3::new(
            centroid.x as f32,
            centroid.y as f32,
            centroid.z as f32,
        ));

        if has_normals {
            let norm = accum.normal.norm();
            point.normal = Some(if norm > 1e-10 {
                let n = accum.normal / norm;
                Vector3::new(n.x as f32, n.y as f32, n.z as f32)
            } else {
                Vector3::z()
            });
        }

        if has_colors {
            point.color = Some(PointColor::new(
                (f64::from(accum.color[0]) * inv).round() as u8,
                (f64::from(accum.color[1]) * inv).round() as u8,
                (f64::from(accum.color[2]) * inv).round() as u8,
            ));
        }

        result.push(point);
    }

    Ok(result)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_nonpositive_size() {
        let cloud = PointCloud::from_positions(&[Point3::origin()]);
        assert!(downsample_voxel(&cloud, 0.0).is_err());
        assert!(downsample_voxel(&cloud, -0.5).is_err());
    }

    #[test]
    fn empty_cloud() {
        let cloud = PointCloud::new();
        let out = downsample_voxel(&cloud, 0.1).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn output_never_grows() {
        let positions: Vec<_> = (0..100)
            .map(|i| Point3::new(i as f32 * 0.01, 0.0, 0.0))
            .collect();
        let cloud = PointCloud::from_positions(&positions);

        let out = downsample_voxel(&cloud, 0.1).unwrap();
        assert!(out.len() <= cloud.len());
        assert!(!out.is_empty());
    }

    #[test]
    fn huge_voxel_yields_single_point() {
        let positions: Vec<_> = (0..50)
            .map(|i| Point3::new(i as f32 * 0.01, (i % 7) as f32 * 0.01, 0.0))
            .collect();
        let cloud = PointCloud::from_positions(&positions);
        let diagonal = cloud.bounds().unwrap().diagonal();

        let out = downsample_voxel(&cloud, diagonal + 1.0).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn centroid_of_members() {
        let cloud = PointCloud::from_positions(&[
            Point3::new(0.01, 0.01, 0.01),
            Point3::new(0.03, 0.03, 0.03),
        ]);
        let out = downsample_voxel(&cloud, 0.1).unwrap();

        assert_eq!(out.len(), 1);
        assert_relative_eq!(out.points[0].position.x, 0.02, epsilon = 1e-6);
    }

    #[test]
    fn normals_are_averaged_and_unit() {
        let mut cloud = PointCloud::new();
        cloud.push_with_normal(Point3::new(0.01, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        cloud.push_with_normal(Point3::new(0.02, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0));

        let out = downsample_voxel(&cloud, 1.0).unwrap();
        assert_eq!(out.len(), 1);

        let n = out.points[0].normal.unwrap();
        assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(n.x, n.y, epsilon = 1e-6);
    }

    #[test]
    fn cancelling_normals_fall_back() {
        let mut cloud = PointCloud::new();
        cloud.push_with_normal(Point3::new(0.01, 0.0, 0.0), Vector3::x());
        cloud.push_with_normal(Point3::new(0.02, 0.0, 0.0), -Vector3::x());

        let out = downsample_voxel(&cloud, 1.0).unwrap();
        assert_relative_eq!(out.points[0].normal.unwrap().z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn colors_are_averaged() {
        let mut cloud = PointCloud::new();
        let mut a = CloudPoint::from_coords(0.01, 0.0, 0.0);
        a.color = Some(PointColor::new(100, 0, 50));
        let mut b = CloudPoint::from_coords(0.02, 0.0, 0.0);
        b.color = Some(PointColor::new(200, 0, 150));
        cloud.push(a);
        cloud.push(b);

        let out = downsample_voxel(&cloud, 1.0).unwrap();
        let c = out.points[0].color.unwrap();
        assert_eq!(c.r, 150);
        assert_eq!(c.b, 100);
    }

    #[test]
    fn grid_assignment_separates_cubes() {
        let cloud = PointCloud::from_positions(&[
            Point3::new(0.05, 0.0, 0.0),
            Point3::new(0.15, 0.0, 0.0),
            Point3::new(-0.05, 0.0, 0.0),
        ]);
        let out = downsample_voxel(&cloud, 0.1).unwrap();
        assert_eq!(out.len(), 3);
    }
}
