//! Weave modulation.
//!
//! Weaving sweeps the torch side to side (and for some patterns toward and
//! away from the surface) while it travels along the seam, widening the
//! bead. The phase of the pattern is driven by arc length through a nominal
//! travel speed, so the pattern is tied to the geometry rather than to
//! wall-clock time.

use crate::params::WeaveKind;
use crate::path::WeldPath;

/// Nominal travel speed used to convert arc length to weave phase.
/// Dimensionless scale: phase = arc_length / `TRAVEL_SPEED`.
const TRAVEL_SPEED: f32 = 0.01;

impl WeldPath {
    /// Applies a weave pattern in place.
    ///
    /// For each weld point the lateral direction is `tangent × normal`; the
    /// position is displaced by the pattern's lateral and normal offsets at
    /// the point's phase. Orientations and arc lengths are untouched.
    ///
    /// [`WeaveKind::None`] and an empty path are no-ops.
    ///
    /// # Example
    ///
    /// ```
    /// use seam_path::{PathParams, WeaveKind, WeldPath};
    /// use nalgebra::{Point3, Vector3};
    ///
    /// let positions: Vec<_> = (0..50)
    ///     .map(|i| Point3::new(i as f32 * 0.001, 0.0, 0.0))
    ///     .collect();
    /// let normals = vec![Vector3::z(); 50];
    /// let mut path = WeldPath::from_points(&positions, &normals, PathParams::default()).unwrap();
    ///
    /// path.apply_weave(WeaveKind::Zigzag, 0.002, 2.0);
    ///
    /// // Lateral excursion stays within the amplitude.
    /// for wp in path.points() {
    ///     assert!(wp.position.y.abs() <= 0.002 + 1e-7);
    /// }
    /// ```
    pub fn apply_weave(&mut self, kind: WeaveKind, amplitude: f32, frequency: f32) {
        if kind == WeaveKind::None || self.is_empty() {
            return;
        }

        for wp in self.points_mut() {
            let phase = wp.arc_length / TRAVEL_SPEED;
            let (lateral_offset, normal_offset) =
                weave_offsets(kind, amplitude, frequency * phase);

            let lateral = wp.tangent.cross(&wp.normal);
            let lateral_norm = lateral.norm();
            if lateral_norm > 1e-6 {
                wp.position += lateral * (lateral_offset / lateral_norm);
            }
            wp.position += wp.normal * normal_offset;
        }
    }

    /// Applies the weave configured in this path's parameters.
    pub fn apply_configured_weave(&mut self) {
        let params = *self.params();
        self.apply_weave(params.weave, params.weave_amplitude, params.weave_frequency);
    }
}

/// Lateral and normal displacement of a pattern at phase `t` (in cycles).
fn weave_offsets(kind: WeaveKind, amplitude: f32, t: f32) -> (f32, f32) {
    use std::f32::consts::TAU;

    match kind {
        WeaveKind::None => (0.0, 0.0),
        WeaveKind::Zigzag => {
            // Triangular wave from -A to A and back, one cycle per unit t.
            let phase = t.fract();
            let lateral = if phase < 0.5 {
                amplitude * (4.0 * phase - 1.0)
            } else {
                amplitude * (3.0 - 4.0 * phase)
            };
            (lateral, 0.0)
        }
        WeaveKind::Circular => (
            amplitude * (TAU * t).sin(),
            0.5 * amplitude * (TAU * t).cos(),
        ),
        WeaveKind::Triangle => {
            let phase = t.fract();
            (amplitude * (1.0 - 4.0 * (phase - 0.5).abs()), 0.0)
        }
        WeaveKind::Figure8 => (
            amplitude * (2.0 * TAU * t).sin(),
            0.5 * amplitude * (TAU * t).sin(),
        ),
    }
}
