//! Indicator-field grid.
//!
//! The reconstructor samples a scalar indicator function on a regular grid
//! of nodes spanning the expanded bounding box of the input cloud. Each
//! oriented point splats a signed-plane contribution into the eight grid
//! nodes around it: the value accumulated at a node is the projection
//! `(x_node - p) · n`, weighted trilinearly, so the zero level set of the
//! averaged field passes through the oriented points.

use nalgebra::{Point3, Vector3};

/// Scalar indicator field sampled on a regular node grid.
///
/// Values are stored in x-fastest order. Node `(i, j, k)` sits at
/// `origin + (i·dx, j·dy, k·dz)`; marching cubes later walks the
/// `(resolution - 1)³` cells between nodes.
#[derive(Debug, Clone)]
pub struct IndicatorGrid {
    values: Vec<f64>,
    weights: Vec<f64>,
    resolution: usize,
    origin: Point3<f64>,
    spacing: Vector3<f64>,
}

impl IndicatorGrid {
    /// Creates an empty grid with `resolution` nodes per axis covering the
    /// box `[origin, origin + resolution * spacing]`.
    #[must_use]
    pub fn new(resolution: usize, origin: Point3<f64>, spacing: Vector3<f64>) -> Self {
        let n = resolution * resolution * resolution;
        Self {
            values: vec![0.0; n],
            weights: vec![0.0; n],
            resolution,
            origin,
            spacing,
        }
    }

    /// Nodes per axis.
    #[must_use]
    pub const fn resolution(&self) -> usize {
        self.resolution
    }

    /// Node spacing per axis.
    #[must_use]
    pub const fn spacing(&self) -> Vector3<f64> {
        self.spacing
    }

    /// World position of a node.
    #[must_use]
    pub fn node_position(&self, i: usize, j: usize, k: usize) -> Point3<f64> {
        Point3::new(
            self.spacing.x.mul_add(i as f64, self.origin.x),
            self.spacing.y.mul_add(j as f64, self.origin.y),
            self.spacing.z.mul_add(k as f64, self.origin.z),
        )
    }

    /// Indicator value at a node (0.0 outside the grid).
    #[must_use]
    pub fn value(&self, i: usize, j: usize, k: usize) -> f64 {
        if i < self.resolution && j < self.resolution && k < self.resolution {
            self.values[self.index(i, j, k)]
        } else {
            0.0
        }
    }

    /// Accumulated splat weight at a node (0.0 outside the grid).
    #[must_use]
    pub fn weight(&self, i: usize, j: usize, k: usize) -> f64 {
        if i < self.resolution && j < self.resolution && k < self.resolution {
            self.weights[self.index(i, j, k)]
        } else {
            0.0
        }
    }

    /// Splats one oriented point into the eight surrounding nodes.
    ///
    /// Each node receives `w · ((x_node - p) · n)` into its value accumulator
    /// and `w` into its weight accumulator, where `w` is the trilinear
    /// weight of the node for `p`.
    pub fn splat(&mut self, position: &Point3<f64>, normal: &Vector3<f64>) {
        let r = self.resolution;
        if r < 2 {
            return;
        }
        let gx = (position.x - self.origin.x) / self.spacing.x;
        let gy = (position.y - self.origin.y) / self.spacing.y;
        let gz = (position.z - self.origin.z) / self.spacing.z;

        let i0 = (gx.floor() as i64).clamp(0, r as i64 - 2) as usize;
        let j0 = (gy.floor() as i64).clamp(0, r as i64 - 2) as usize;
        let k0 = (gz.floor() as i64).clamp(0, r as i64 - 2) as usize;

        let fx = (gx - i0 as f64).clamp(0.0, 1.0);
        let fy = (gy - j0 as f64).clamp(0.0, 1.0);
        let fz = (gz - k0 as f64).clamp(0.0, 1.0);

        for dk in 0..2 {
            for dj in 0..2 {
                for di in 0..2 {
                    let wx = if di == 0 { 1.0 - fx } else { fx };
                    let wy = if dj == 0 { 1.0 - fy } else { fy };
                    let wz = if dk == 0 { 1.0 - fz } else { fz };
                    let w = wx * wy * wz;
                    if w <= 0.0 {
                        continue;
                    }

                    let (i, j, k) = (i0 + di, j0 + dj, k0 + dk);
                    let node = self.node_position(i, j, k);
                    let signed = (node - position).dot(normal);

                    let idx = self.index(i, j, k);
                    self.values[idx] += w * signed;
                    self.weights[idx] += w;
                }
            }
        }
    }

    /// Divides each accumulated value by its weight.
    ///
    /// Nodes that received no splats keep their zero value.
    pub fn normalize(&mut self) {
        for (value, weight) in self.values.iter_mut().zip(self.weights.iter()) {
            if *weight > 0.0 {
                *value /= *weight;
            }
        }
    }

    /// Indicator gradient at a node by central differences (one-sided on the
    /// grid border).
    #[must_use]
    pub fn gradient(&self, i: usize, j: usize, k: usize) -> Vector3<f64> {
        if self.resolution == 0 {
            return Vector3::zeros();
        }
        let axis = |lo: f64, hi: f64, span: f64| {
            if span > 0.0 {
                (hi - lo) / span
            } else {
                0.0
            }
        };

        let r = self.resolution;
        let (x_lo, x_hi, x_span) = neighbor_span(i, r);
        let (y_lo, y_hi, y_span) = neighbor_span(j, r);
        let (z_lo, z_hi, z_span) = neighbor_span(k, r);

        Vector3::new(
            axis(
                self.value(x_lo, j, k),
                self.value(x_hi, j, k),
                x_span * self.spacing.x,
            ),
            axis(
                self.value(i, y_lo, k),
                self.value(i, y_hi, k),
                y_span * self.spacing.y,
            ),
            axis(
                self.value(i, j, z_lo),
                self.value(i, j, z_hi),
                z_span * self.spacing.z,
            ),
        )
    }

    fn index(&self, i: usize, j: usize, k: usize) -> usize {
        i + j * self.resolution + k * self.resolution * self.resolution
    }

    /// Overwrites one node, for synthesizing fields in tests.
    #[cfg(test)]
    pub(crate) fn set_node(&mut self, i: usize, j: usize, k: usize, value: f64, weight: f64) {
        let idx = self.index(i, j, k);
        self.values[idx] = value;
        self.weights[idx] = weight;
    }
}

/// Lower/upper neighbor indices and their index span for a difference
/// stencil at `i` on an axis with `r` nodes.
fn neighbor_span(i: usize, r: usize) -> (usize, usize, f64) {
    let lo = i.saturating_sub(1);
    let hi = (i + 1).min(r - 1);
    (lo, hi, (hi - lo) as f64)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_grid(resolution: usize) -> IndicatorGrid {
        let spacing = 1.0 / resolution as f64;
        IndicatorGrid::new(
            resolution,
            Point3::origin(),
            Vector3::new(spacing, spacing, spacing),
        )
    }

    #[test]
    fn node_positions() {
        let grid = unit_grid(10);
        let p = grid.node_position(5, 0, 0);
        assert_relative_eq!(p.x, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn out_of_bounds_reads_are_zero() {
        let grid = unit_grid(4);
        assert_eq!(grid.value(100, 0, 0), 0.0);
        assert_eq!(grid.weight(0, 100, 0), 0.0);
    }

    #[test]
    fn splat_signs_straddle_the_surface() {
        // A single point in the middle of a cell with normal +x: nodes on
        // the -x side accumulate negative values, +x side positive.
        let mut grid = unit_grid(8);
        let p = Point3::new(0.5 + 0.0625, 0.5, 0.5); // between nodes 4 and 5
        grid.splat(&p, &Vector3::x());
        grid.normalize();

        assert!(grid.value(4, 4, 4) < 0.0);
        assert!(grid.value(5, 4, 4) > 0.0);
    }

    #[test]
    fn weights_accumulate() {
        let mut grid = unit_grid(8);
        let p = Point3::new(0.5, 0.5, 0.5);
        grid.splat(&p, &Vector3::z());

        let grid_ref = &grid;
        let total: f64 = (0..2)
            .flat_map(|dk| {
                (0..2).flat_map(move |dj| (0..2).map(move |di| grid_ref.weight(4 + di, 4 + dj, 4 + dk)))
            })
            .sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn normalize_leaves_empty_nodes_alone() {
        let mut grid = unit_grid(4);
        grid.normalize();
        assert_eq!(grid.value(0, 0, 0), 0.0);
    }

    #[test]
    fn gradient_of_linear_field() {
        // Fill the grid with f = x and check the gradient is ~(1, 0, 0).
        let mut grid = unit_grid(8);
        for k in 0..8 {
            for j in 0..8 {
                for i in 0..8 {
                    let idx = i + j * 8 + k * 64;
                    grid.values[idx] = grid.node_position(i, j, k).x;
                }
            }
        }

        let g = grid.gradient(4, 4, 4);
        assert_relative_eq!(g.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(g.y, 0.0, epsilon = 1e-9);

        // Border stencil is one-sided but still exact for a linear field.
        let g = grid.gradient(0, 0, 0);
        assert_relative_eq!(g.x, 1.0, epsilon = 1e-9);
    }
}
