//! Arc-length resampling.

use seam_types::WeldPoint;

use crate::error::{PathError, PathResult};
use crate::path::WeldPath;

impl WeldPath {
    /// Resamples the path at uniform arc-length steps.
    ///
    /// The new path has `⌈L/step⌉ + 1` points at arc lengths
    /// `0, step, 2*step, ..., L`. Position, normal, and tangent are linearly
    /// interpolated between the bracketing source points and the normal and
    /// tangent re-normalized; arc lengths are then recomputed from the
    /// interpolated positions.
    ///
    /// Paths with fewer than two points are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if `step` is not positive.
    ///
    /// # Example
    ///
    /// ```
    /// use seam_path::{PathParams, WeldPath};
    /// use nalgebra::{Point3, Vector3};
    ///
    /// let positions = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(0.1, 0.0, 0.0),
    /// ];
    /// let normals = vec![Vector3::z(); 2];
    /// let mut path = WeldPath::from_points(&positions, &normals, PathParams::default()).unwrap();
    ///
    /// path.resample(0.025).unwrap();
    /// assert_eq!(path.len(), 5);
    /// ```
    pub fn resample(&mut self, step: f32) -> PathResult<()> {
        if step <= 0.0 {
            return Err(PathError::invalid("step size must be positive"));
        }
        if self.len() < 2 {
            return Ok(());
        }

        let total = self.total_length();
        let segments = (total / step).ceil() as usize;
        let mut resampled: Vec<WeldPoint> = Vec::with_capacity(segments + 1);

        let points = self.points();
        let mut src = 0usize;

        for i in 0..=segments {
            let target = (i as f32 * step).min(total);

            while src < points.len() - 1 && points[src + 1].arc_length < target {
                src += 1;
            }

            if src >= points.len() - 1 {
                resampled.push(points[points.len() - 1]);
                continue;
            }

            let p0 = &points[src];
            let p1 = &points[src + 1];
            let span = p1.arc_length - p0.arc_length;
            let t = if span > 1e-12 {
                ((target - p0.arc_length) / span).clamp(0.0, 1.0)
            } else {
                0.0
            };

            let mut wp = WeldPoint::new(
                p0.position + (p1.position - p0.position) * t,
                p0.normal + (p1.normal - p0.normal) * t,
                p0.tangent + (p1.tangent - p0.tangent) * t,
                target,
            );
            renormalize(&mut wp);
            resampled.push(wp);
        }

        *self.points_mut() = resampled;
        self.recompute_arc_lengths();
        Ok(())
    }
}

fn renormalize(wp: &mut WeldPoint) {
    let n = wp.normal.norm();
    if n > 1e-6 {
        wp.normal /= n;
    }
    let t = wp.tangent.norm();
    if t > 1e-6 {
        wp.tangent /= t;
    }
}
