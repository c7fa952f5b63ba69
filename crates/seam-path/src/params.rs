//! Path-planning parameters.

/// Weave pattern applied along a weld path to widen the bead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeaveKind {
    /// No weave; the torch follows the seam directly.
    #[default]
    None,
    /// Triangular side-to-side sweep.
    Zigzag,
    /// Circular motion in the lateral/normal plane.
    Circular,
    /// Symmetric triangular sweep centered on the seam.
    Triangle,
    /// Figure-eight pattern.
    Figure8,
}

/// Parameters describing how a weld path is generated and traversed.
///
/// Distances are in meters, angles in radians, the weave frequency in Hz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathParams {
    /// Resampling step along the seam. Default: 5 mm.
    pub step_size: f32,

    /// Tool standoff from the surface along the normal. Default: 15 mm.
    pub standoff: f32,

    /// Torch approach angle. Default: 0.
    pub approach_angle: f32,

    /// Torch travel angle. Default: 0.
    pub travel_angle: f32,

    /// Weave pattern. Default: none.
    pub weave: WeaveKind,

    /// Weave amplitude. Default: 2 mm.
    pub weave_amplitude: f32,

    /// Weave frequency. Default: 2 Hz.
    pub weave_frequency: f32,
}

impl Default for PathParams {
    fn default() -> Self {
        Self {
            step_size: 0.005,
            standoff: 0.015,
            approach_angle: 0.0,
            travel_angle: 0.0,
            weave: WeaveKind::None,
            weave_amplitude: 0.002,
            weave_frequency: 2.0,
        }
    }
}

impl PathParams {
    /// Creates parameters with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the resampling step.
    #[must_use]
    pub const fn with_step_size(mut self, step: f32) -> Self {
        self.step_size = step;
        self
    }

    /// Sets the tool standoff.
    #[must_use]
    pub const fn with_standoff(mut self, standoff: f32) -> Self {
        self.standoff = standoff;
        self
    }

    /// Sets the weave pattern.
    #[must_use]
    pub const fn with_weave(mut self, weave: WeaveKind) -> Self {
        self.weave = weave;
        self
    }

    /// Sets the weave amplitude.
    #[must_use]
    pub const fn with_weave_amplitude(mut self, amplitude: f32) -> Self {
        self.weave_amplitude = amplitude;
        self
    }

    /// Sets the weave frequency.
    #[must_use]
    pub const fn with_weave_frequency(mut self, frequency: f32) -> Self {
        self.weave_frequency = frequency;
        self
    }
}
