//! Marching-cubes isosurface extraction.

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};
use tracing::debug;

use seam_types::WeldMesh;

use crate::grid::IndicatorGrid;
use crate::tables::{CORNER_OFFSETS, EDGE_CORNERS, EDGE_TABLE, TRI_TABLE};

/// Extracts the isosurface of `grid` at level `iso` as an indexed mesh.
///
/// Each of the `(r-1)³` cells between grid nodes is classified against the
/// iso level; crossed edges produce vertices by linear interpolation and the
/// canonical triangle table turns them into faces. Vertices on edges shared
/// by neighboring cells are emitted once.
///
/// Output normals are the negated, normalized indicator gradient sampled by
/// central differences and interpolated along the crossing edge. Per-vertex
/// density is the mean splat weight of the generating cell; a vertex shared
/// between cells keeps the minimum.
#[must_use]
pub fn extract_isosurface(grid: &IndicatorGrid, iso: f64) -> WeldMesh {
    let r = grid.resolution();
    if r < 2 {
        return WeldMesh::new();
    }

    let mut mesh = WeldMesh::new();
    // Maps the undirected node pair of a crossed edge to its vertex index.
    let mut edge_vertices: HashMap<(usize, usize), u32> = HashMap::new();

    let node_id = |i: usize, j: usize, k: usize| i + j * r + k * r * r;

    for cz in 0..r - 1 {
        for cy in 0..r - 1 {
            for cx in 0..r - 1 {
                let mut values = [0.0f64; 8];
                let mut cube_index = 0usize;
                for (c, offset) in CORNER_OFFSETS.iter().enumerate() {
                    let v = grid.value(cx + offset[0], cy + offset[1], cz + offset[2]);
                    values[c] = v;
                    if v < iso {
                        cube_index |= 1 << c;
                    }
                }

                let edge_mask = EDGE_TABLE[cube_index];
                if edge_mask == 0 {
                    continue;
                }

                // Mean corner weight of this cell, used as vertex density.
                let cell_weight = CORNER_OFFSETS
                    .iter()
                    .map(|o| grid.weight(cx + o[0], cy + o[1], cz + o[2]))
                    .sum::<f64>()
                    / 8.0;

                let mut cell_vertex = [0u32; 12];
                for (edge, corners) in EDGE_CORNERS.iter().enumerate() {
                    if edge_mask & (1 << edge) == 0 {
                        continue;
                    }

                    let a = CORNER_OFFSETS[corners[0]];
                    let b = CORNER_OFFSETS[corners[1]];
                    let na = (cx + a[0], cy + a[1], cz + a[2]);
                    let nb = (cx + b[0], cy + b[1], cz + b[2]);

                    let ka = node_id(na.0, na.1, na.2);
                    let kb = node_id(nb.0, nb.1, nb.2);
                    let key = if ka < kb { (ka, kb) } else { (kb, ka) };

                    match edge_vertices.get(&key).copied() {
                        Some(idx) => {
                            let d = &mut mesh.densities[idx as usize];
                            *d = d.min(cell_weight as f32);
                            cell_vertex[edge] = idx;
                        }
                        None => {
                            let va = values[corners[0]];
                            let vb = values[corners[1]];
                            let t = interpolation_parameter(iso, va, vb);

                            let pa = grid.node_position(na.0, na.1, na.2);
                            let pb = grid.node_position(nb.0, nb.1, nb.2);
                            let position = pa + (pb - pa) * t;

                            let ga = grid.gradient(na.0, na.1, na.2);
                            let gb = grid.gradient(nb.0, nb.1, nb.2);
                            let normal = surface_normal(&ga, &gb, t);

                            let idx = mesh.positions.len() as u32;
                            mesh.positions.push(Point3::new(
                                position.x as f32,
                                position.y as f32,
                                position.z as f32,
                            ));
                            mesh.normals.push(normal);
                            mesh.densities.push(cell_weight as f32);
                            edge_vertices.insert(key, idx);
                            cell_vertex[edge] = idx;
                        }
                    }
                }

                for triple in TRI_TABLE[cube_index].chunks_exact(3) {
                    if triple[0] < 0 {
                        break;
                    }
                    let t0 = cell_vertex[triple[0] as usize];
                    let t1 = cell_vertex[triple[1] as usize];
                    let t2 = cell_vertex[triple[2] as usize];
                    if t0 != t1 && t1 != t2 && t0 != t2 {
                        mesh.triangles.push([t0, t1, t2]);
                    }
                }
            }
        }
    }

    debug!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "extracted isosurface"
    );

    mesh
}

/// Edge interpolation parameter `(iso - va) / (vb - va)`, clamped to [0, 1].
fn interpolation_parameter(iso: f64, va: f64, vb: f64) -> f64 {
    let denom = vb - va;
    if denom.abs() < 1e-12 {
        0.5
    } else {
        ((iso - va) / denom).clamp(0.0, 1.0)
    }
}

/// Negated normalized gradient interpolated along the edge, +z fallback.
fn surface_normal(ga: &Vector3<f64>, gb: &Vector3<f64>, t: f64) -> Vector3<f32> {
    let g = ga + (gb - ga) * t;
    let norm = g.norm();
    if norm > 1e-12 {
        let n = -g / norm;
        Vector3::new(n.x as f32, n.y as f32, n.z as f32)
    } else {
        Vector3::z()
    }
}
