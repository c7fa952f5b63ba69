//! Quadric error metric for edge collapse.
//!
//! A quadric is the symmetric 4x4 matrix of a sum of squared
//! point-to-plane distances. Accumulated per vertex from the planes of its
//! incident faces, it prices a collapse candidate by the error at the merged
//! position.

use nalgebra::{Point3, Vector3};

/// Sum-of-squared-plane-distances error form, stored as the upper triangle
/// of the symmetric 4x4 matrix.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quadric {
    // [a² ab ac ad, b² bc bd, c² cd, d²] for the plane ax + by + cz + d = 0.
    q: [f64; 10],
}

impl Quadric {
    /// Quadric of a single plane with unit normal `n` through offset `d`
    /// (plane equation `n · x + d = 0`).
    #[must_use]
    pub fn from_plane(n: Vector3<f64>, d: f64) -> Self {
        Self {
            q: [
                n.x * n.x,
                n.x * n.y,
                n.x * n.z,
                n.x * d,
                n.y * n.y,
                n.y * n.z,
                n.y * d,
                n.z * n.z,
                n.z * d,
                d * d,
            ],
        }
    }

    /// Quadric of the supporting plane of a triangle, or `None` when the
    /// triangle is degenerate.
    #[must_use]
    pub fn from_triangle(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Option<Self> {
        let normal = (b - a).cross(&(c - a));
        let len = normal.norm();
        if len < 1e-12 {
            return None;
        }
        let n = normal / len;
        Some(Self::from_plane(n, -n.dot(&a.coords)))
    }

    /// Accumulates another quadric into this one.
    pub fn add(&mut self, other: &Self) {
        for (lhs, rhs) in self.q.iter_mut().zip(other.q.iter()) {
            *lhs += rhs;
        }
    }

    /// Error `vᵀ Q v` at a point, with `v = (x, y, z, 1)`.
    #[must_use]
    pub fn evaluate(&self, p: &Point3<f64>) -> f64 {
        let [a, b, c, d, e, f, g, h, i, j] = self.q;
        let (x, y, z) = (p.x, p.y, p.z);

        a * x * x
            + e * y * y
            + h * z * z
            + 2.0 * (b * x * y + c * x * z + f * y * z + d * x + g * y + i * z)
            + j
    }

    /// The point minimizing the error, or `None` when the 3x3 block is
    /// numerically singular (for example, all planes parallel).
    #[must_use]
    pub fn minimizer(&self) -> Option<Point3<f64>> {
        let [a, b, c, d, e, f, g, h, i, _] = self.q;

        let m = nalgebra::Matrix3::new(a, b, c, b, e, f, c, f, h);
        let rhs = Vector3::new(-d, -g, -i);

        let det = m.determinant();
        if det.abs() < 1e-10 {
            return None;
        }

        m.try_inverse().map(|inv| Point3::from(inv * rhs))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_quadric_has_zero_error() {
        let q = Quadric::default();
        assert_relative_eq!(q.evaluate(&Point3::new(1.0, 2.0, 3.0)), 0.0);
    }

    #[test]
    fn plane_distance_is_squared() {
        // Plane z = 0.
        let q = Quadric::from_plane(Vector3::z(), 0.0);

        assert_relative_eq!(q.evaluate(&Point3::new(1.0, 2.0, 0.0)), 0.0, epsilon = 1e-12);
        assert_relative_eq!(q.evaluate(&Point3::new(0.0, 0.0, 2.0)), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn offset_plane() {
        // Plane z = 1 -> n·x + d = 0 with d = -1.
        let q = Quadric::from_plane(Vector3::z(), -1.0);
        assert_relative_eq!(q.evaluate(&Point3::new(0.0, 0.0, 1.0)), 0.0, epsilon = 1e-12);
        assert_relative_eq!(q.evaluate(&Point3::origin()), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn accumulated_planes_meet_at_corner() {
        let mut q = Quadric::from_plane(Vector3::x(), 0.0);
        q.add(&Quadric::from_plane(Vector3::y(), 0.0));
        q.add(&Quadric::from_plane(Vector3::z(), 0.0));

        let p = q.minimizer().unwrap();
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn single_plane_has_no_unique_minimizer() {
        let q = Quadric::from_plane(Vector3::z(), 0.0);
        assert!(q.minimizer().is_none());
    }

    #[test]
    fn triangle_quadric() {
        let q = Quadric::from_triangle(
            &Point3::new(0.0, 0.0, 1.0),
            &Point3::new(1.0, 0.0, 1.0),
            &Point3::new(0.0, 1.0, 1.0),
        )
        .unwrap();

        assert_relative_eq!(q.evaluate(&Point3::new(0.3, 0.3, 1.0)), 0.0, epsilon = 1e-12);
        assert_relative_eq!(q.evaluate(&Point3::new(0.0, 0.0, 3.0)), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_triangle_rejected() {
        let p = Point3::origin();
        assert!(Quadric::from_triangle(&p, &p, &p).is_none());
    }
}
