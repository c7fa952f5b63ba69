//! Moving-average path smoothing.

use nalgebra::{Point3, Vector3};

use crate::error::{PathError, PathResult};
use crate::path::WeldPath;

impl WeldPath {
    /// Smooths positions and normals with a centered moving average.
    ///
    /// Interior points are replaced by the window average; the first and
    /// last `window / 2` points are left unchanged. Normals are
    /// re-normalized afterwards, tangents recomputed as central
    /// differences, and arc lengths rebuilt from the new positions. The
    /// smoother never changes the number of points.
    ///
    /// Odd windows are centered exactly and preferred. Paths shorter than
    /// the window are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if `window` is less than 3.
    ///
    /// # Example
    ///
    /// ```
    /// use seam_path::{PathParams, WeldPath};
    /// use nalgebra::{Point3, Vector3};
    ///
    /// // A jittery straight seam.
    /// let positions: Vec<_> = (0..20)
    ///     .map(|i| Point3::new(i as f32 * 0.01, if i % 2 == 0 { 1e-3 } else { -1e-3 }, 0.0))
    ///     .collect();
    /// let normals = vec![Vector3::z(); 20];
    /// let mut path = WeldPath::from_points(&positions, &normals, PathParams::default()).unwrap();
    ///
    /// path.smooth(5).unwrap();
    /// assert_eq!(path.len(), 20);
    /// ```
    pub fn smooth(&mut self, window: usize) -> PathResult<()> {
        if window < 3 {
            return Err(PathError::invalid("smoothing window must be at least 3"));
        }
        if self.len() < window {
            return Ok(());
        }

        let half = window / 2;
        let n = self.len();
        let source = self.points().to_vec();

        for i in half..n - half {
            let mut position_sum = Vector3::<f32>::zeros();
            let mut normal_sum = Vector3::<f32>::zeros();
            let span = i - half..=i + half;
            let count = (2 * half + 1) as f32;

            for j in span {
                position_sum += source[j].position.coords;
                normal_sum += source[j].normal;
            }

            let points = self.points_mut();
            points[i].position = Point3::from(position_sum / count);
            let norm = normal_sum.norm();
            if norm > 1e-6 {
                points[i].normal = normal_sum / norm;
            }
        }

        self.recompute_tangents();
        self.recompute_arc_lengths();
        Ok(())
    }
}
