//! ASCII PCD reading.
//!
//! Reads the minimal PCD variant used by the scanners feeding this
//! pipeline: a header with `POINTS N` and `DATA ascii`, then `x y z` per
//! line.

use std::io::{BufRead, BufReader};
use std::path::Path;

use nalgebra::Point3;

use seam_types::PointCloud;

use crate::error::{open, IoError, IoResult};

/// Loads a point cloud from an ASCII PCD file.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] for a missing file and
/// [`IoError::Format`] for a binary file or malformed content.
///
/// # Example
///
/// ```no_run
/// let cloud = seam_io::load_cloud_pcd("scan.pcd").unwrap();
/// println!("loaded {} points", cloud.len());
/// ```
pub fn load_cloud_pcd<P: AsRef<Path>>(path: P) -> IoResult<PointCloud> {
    let file = open(path.as_ref())?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let mut point_count: Option<usize> = None;

    // Header runs until the DATA line.
    for line in lines.by_ref() {
        let line = line?;
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("POINTS") => {
                let count = tokens
                    .next()
                    .ok_or_else(|| IoError::format("PCD", "POINTS line without a count"))?;
                point_count = Some(
                    count
                        .parse()
                        .map_err(|_| IoError::format("PCD", "invalid point count"))?,
                );
            }
            Some("DATA") => {
                if tokens.next() != Some("ascii") {
                    return Err(IoError::format("PCD", "only ascii data is supported"));
                }
                break;
            }
            _ => {}
        }
    }

    let Some(point_count) = point_count else {
        return Err(IoError::format("PCD", "missing POINTS declaration"));
    };

    let mut cloud = PointCloud::with_capacity(point_count);

    for _ in 0..point_count {
        let line = lines
            .next()
            .ok_or_else(|| IoError::format("PCD", "unexpected end of point data"))??;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 {
            return Err(IoError::format("PCD", "point line with fewer than 3 values"));
        }

        let mut xyz = [0.0f32; 3];
        for (value, token) in xyz.iter_mut().zip(tokens.iter()) {
            *value = token
                .parse()
                .map_err(|_| IoError::format("PCD", format!("invalid coordinate: {token}")))?;
        }

        cloud.push_coords(xyz[0], xyz[1], xyz[2]);
    }

    Ok(cloud)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::tempdir;

    #[test]
    fn loads_ascii_pcd() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scan.pcd");
        std::fs::write(
            &path,
            "# .PCD v0.7 - Point Cloud Data file format\n\
             VERSION 0.7\n\
             FIELDS x y z\n\
             SIZE 4 4 4\n\
             TYPE F F F\n\
             COUNT 1 1 1\n\
             WIDTH 3\n\
             HEIGHT 1\n\
             VIEWPOINT 0 0 0 1 0 0 0\n\
             POINTS 3\n\
             DATA ascii\n\
             0 0 0\n\
             1.5 0 0\n\
             0 2.5 -1\n",
        )
        .unwrap();

        let cloud = load_cloud_pcd(&path).unwrap();
        assert_eq!(cloud.len(), 3);
        assert_relative_eq!(cloud.points[1].position.x, 1.5);
        assert_relative_eq!(cloud.points[2].position.z, -1.0);
    }

    #[test]
    fn missing_file() {
        let err = load_cloud_pcd("/no/such/scan.pcd").unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }

    #[test]
    fn rejects_binary_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bin.pcd");
        std::fs::write(&path, "POINTS 1\nDATA binary\n").unwrap();

        let err = load_cloud_pcd(&path).unwrap_err();
        assert!(matches!(err, IoError::Format { .. }));
    }

    #[test]
    fn rejects_missing_points_declaration() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nopoints.pcd");
        std::fs::write(&path, "DATA ascii\n0 0 0\n").unwrap();

        let err = load_cloud_pcd(&path).unwrap_err();
        assert!(matches!(err, IoError::Format { .. }));
    }

    #[test]
    fn rejects_truncated_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.pcd");
        std::fs::write(&path, "POINTS 2\nDATA ascii\n0 0 0\n").unwrap();

        let err = load_cloud_pcd(&path).unwrap_err();
        assert!(matches!(err, IoError::Format { .. }));
    }
}
