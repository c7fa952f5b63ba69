//! Surface reconstruction from oriented point clouds.

use nalgebra::{Point3, Vector3};
use tracing::info;

use seam_types::{PointCloud, WeldMesh};

use crate::error::{SurfaceError, SurfaceResult};
use crate::grid::IndicatorGrid;
use crate::marching::extract_isosurface;

/// Smallest admissible grid depth (64 nodes per axis).
pub const MIN_DEPTH: u32 = 6;

/// Largest admissible grid depth (4096 nodes per axis).
pub const MAX_DEPTH: u32 = 12;

/// Parameters for volumetric reconstruction.
#[derive(Debug, Clone)]
pub struct ReconstructionParams {
    /// Grid depth: the indicator field uses `2^depth` nodes per axis.
    /// Valid range is `[6, 12]`. Default: 8.
    pub depth: u32,

    /// Bounding-box expansion: each axis extent of the input bounds is
    /// scaled by this factor before gridding. Valid range is `[1.0, 1.5]`.
    /// Default: 1.1.
    pub scale: f32,

    /// Iso level of the extracted surface. Default: 0.0.
    pub iso: f64,
}

impl Default for ReconstructionParams {
    fn default() -> Self {
        Self {
            depth: 8,
            scale: 1.1,
            iso: 0.0,
        }
    }
}

impl ReconstructionParams {
    /// Creates parameters with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the grid depth.
    #[must_use]
    pub const fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Sets the bounding-box scale.
    #[must_use]
    pub const fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    fn validate(&self) -> SurfaceResult<()> {
        if self.depth < MIN_DEPTH || self.depth > MAX_DEPTH {
            return Err(SurfaceError::invalid(format!(
                "depth must be in [{MIN_DEPTH}, {MAX_DEPTH}], got {}",
                self.depth
            )));
        }
        if !(1.0..=1.5).contains(&self.scale) {
            return Err(SurfaceError::invalid(format!(
                "scale must be in [1.0, 1.5], got {}",
                self.scale
            )));
        }
        Ok(())
    }
}

/// Result of a reconstruction pass.
#[derive(Debug, Clone)]
pub struct Reconstruction {
    /// The reconstructed mesh with per-vertex densities.
    pub mesh: WeldMesh,

    /// Nodes per axis of the indicator grid.
    pub grid_resolution: usize,

    /// Number of points splatted into the field.
    pub splatted_points: usize,
}

impl std::fmt::Display for Reconstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Reconstruction: {} vertices, {} triangles on a {}³ grid",
            self.mesh.vertex_count(),
            self.mesh.triangle_count(),
            self.grid_resolution
        )
    }
}

/// Reconstructs a triangle mesh from an oriented point cloud.
///
/// The expanded bounding box of the cloud is sampled with an indicator
/// field built by signed-projection splatting of the oriented points; the
/// iso-level surface of that field is extracted with marching cubes. The
/// output mesh carries per-vertex densities for [`crate::remove_low_density`].
///
/// # Errors
///
/// Returns an error when the cloud is empty, the cloud has no normals, a
/// parameter is out of range, or the isosurface is empty.
///
/// # Example
///
/// ```
/// use seam_surface::{reconstruct_surface, ReconstructionParams};
/// use seam_types::PointCloud;
/// use nalgebra::{Point3, Vector3};
///
/// let mut cloud = PointCloud::new();
/// for i in 0..8 {
///     let corner = Point3::new(
///         (i & 1) as f32,
///         ((i >> 1) & 1) as f32,
///         ((i >> 2) & 1) as f32,
///     );
///     let normal = (corner - Point3::new(0.5, 0.5, 0.5)).normalize();
///     cloud.push_with_normal(corner, normal);
/// }
///
/// let params = ReconstructionParams::new().with_depth(6).with_scale(1.2);
/// let result = reconstruct_surface(&cloud, &params).unwrap();
/// assert!(result.mesh.triangle_count() > 0);
/// ```
pub fn reconstruct_surface(
    cloud: &PointCloud,
    params: &ReconstructionParams,
) -> SurfaceResult<Reconstruction> {
    params.validate()?;

    if cloud.is_empty() {
        return Err(SurfaceError::EmptyCloud);
    }
    if !cloud.has_normals() {
        return Err(SurfaceError::MissingNormals);
    }

    let Some(bounds) = cloud.bounds() else {
        return Err(SurfaceError::EmptyCloud);
    };
    let expanded = bounds.scaled(params.scale);

    let resolution = 1usize << params.depth;
    let origin = Point3::new(
        f64::from(expanded.min.x),
        f64::from(expanded.min.y),
        f64::from(expanded.min.z),
    );
    let extents = expanded.extents();
    // Degenerate axes (planar or linear clouds) still need a nonzero cell.
    let spacing = Vector3::new(
        f64::from(extents.x).max(1e-6) / resolution as f64,
        f64::from(extents.y).max(1e-6) / resolution as f64,
        f64::from(extents.z).max(1e-6) / resolution as f64,
    );

    info!(
        points = cloud.len(),
        resolution,
        "building indicator field"
    );

    let mut grid = IndicatorGrid::new(resolution, origin, spacing);

    for point in &cloud.points {
        let p = point.position.cast::<f64>();
        let n = point
            .normal
            .map_or_else(Vector3::z, |n| n.cast::<f64>());
        grid.splat(&p, &n);
    }
    grid.normalize();

    let mesh = extract_isosurface(&grid, params.iso);
    if mesh.is_empty() {
        return Err(SurfaceError::ReconstructionFailed {
            reason: "isosurface is empty".to_string(),
        });
    }

    Ok(Reconstruction {
        mesh,
        grid_resolution: resolution,
        splatted_points: cloud.len(),
    })
}
