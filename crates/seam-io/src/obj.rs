//! Wavefront OBJ writing.

use std::io::{BufWriter, Write};
use std::path::Path;

use seam_types::WeldMesh;

use crate::error::IoResult;

/// Saves a mesh as a Wavefront OBJ file.
///
/// Writes `v` positions, `vn` normals, and `f v//n v//n v//n` faces with
/// 1-based indices.
///
/// # Errors
///
/// Returns an error when the file cannot be written.
///
/// # Example
///
/// ```no_run
/// use seam_types::WeldMesh;
///
/// let mesh = WeldMesh::new();
/// seam_io::save_mesh_obj(&mesh, "out.obj").unwrap();
/// ```
pub fn save_mesh_obj<P: AsRef<Path>>(mesh: &WeldMesh, path: P) -> IoResult<()> {
    let file = std::fs::File::create(path)?;
    let mut w = BufWriter::new(file);

    writeln!(w, "# seamforge mesh")?;
    writeln!(w, "# vertices: {}", mesh.vertex_count())?;
    writeln!(w, "# faces: {}", mesh.triangle_count())?;
    writeln!(w)?;

    for p in &mesh.positions {
        writeln!(w, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for n in &mesh.normals {
        writeln!(w, "vn {} {} {}", n.x, n.y, n.z)?;
    }

    for t in &mesh.triangles {
        let (a, b, c) = (t[0] + 1, t[1] + 1, t[2] + 1);
        writeln!(w, "f {a}//{a} {b}//{b} {c}//{c}")?;
    }

    Ok(())
}
