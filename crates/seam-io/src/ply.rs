//! ASCII PLY reading and writing.
//!
//! Supports the subset of PLY produced by common scanners and by this
//! pipeline: `float` vertex positions, optional `float` normals, optional
//! `uchar` colors, and faces as `vertex_indices` lists.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::{Point3, Vector3};

use seam_types::{CloudPoint, PointCloud, PointColor, WeldMesh};

use crate::error::{open, IoError, IoResult};

#[derive(Debug, Default)]
struct PlyHeader {
    vertex_count: usize,
    face_count: usize,
    has_normals: bool,
    has_colors: bool,
}

fn parse_header(lines: &mut impl Iterator<Item = std::io::Result<String>>) -> IoResult<PlyHeader> {
    let mut header = PlyHeader::default();
    let mut in_vertex_element = false;
    let mut seen_magic = false;
    let mut ended = false;

    for line in lines {
        let line = line?;
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("ply") => seen_magic = true,
            Some("format") => {
                if tokens.next() != Some("ascii") {
                    return Err(IoError::format("PLY", "only ascii format is supported"));
                }
            }
            Some("element") => match (tokens.next(), tokens.next()) {
                (Some("vertex"), Some(count)) => {
                    in_vertex_element = true;
                    header.vertex_count = count
                        .parse()
                        .map_err(|_| IoError::format("PLY", "invalid vertex count"))?;
                }
                (Some("face"), Some(count)) => {
                    in_vertex_element = false;
                    header.face_count = count
                        .parse()
                        .map_err(|_| IoError::format("PLY", "invalid face count"))?;
                }
                _ => in_vertex_element = false,
            },
            Some("property") if in_vertex_element => {
                let _dtype = tokens.next();
                match tokens.next() {
                    Some("nx") => header.has_normals = true,
                    Some("red") => header.has_colors = true,
                    _ => {}
                }
            }
            Some("end_header") => {
                ended = true;
                break;
            }
            _ => {}
        }
    }

    if !seen_magic {
        return Err(IoError::format("PLY", "missing ply magic line"));
    }
    if !ended {
        return Err(IoError::format("PLY", "missing end_header"));
    }
    Ok(header)
}

fn parse_floats(tokens: &[&str], count: usize, what: &str) -> IoResult<Vec<f32>> {
    if tokens.len() < count {
        return Err(IoError::format(
            "PLY",
            format!("truncated {what} line: expected {count} values"),
        ));
    }
    tokens[..count]
        .iter()
        .map(|t| {
            t.parse::<f32>()
                .map_err(|_| IoError::format("PLY", format!("invalid {what} value: {t}")))
        })
        .collect()
}

/// Loads a point cloud from an ASCII PLY file.
///
/// Positions are required; normals (`nx ny nz`) and 8-bit colors
/// (`red green blue`) are picked up when the header declares them.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] for a missing file and
/// [`IoError::Format`] for malformed content.
///
/// # Example
///
/// ```no_run
/// let cloud = seam_io::load_cloud_ply("scan.ply").unwrap();
/// println!("loaded {} points", cloud.len());
/// ```
pub fn load_cloud_ply<P: AsRef<Path>>(path: P) -> IoResult<PointCloud> {
    let file = open(path.as_ref())?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header = parse_header(&mut lines)?;
    let mut cloud = PointCloud::with_capacity(header.vertex_count);

    for _ in 0..header.vertex_count {
        let line = lines
            .next()
            .ok_or_else(|| IoError::format("PLY", "unexpected end of vertex data"))??;
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let xyz = parse_floats(&tokens, 3, "position")?;
        let mut point = CloudPoint::new(Point3::new(xyz[0], xyz[1], xyz[2]));
        let mut cursor = 3;

        if header.has_normals {
            let n = parse_floats(&tokens[cursor..], 3, "normal")?;
            point.normal = Some(Vector3::new(n[0], n[1], n[2]));
            cursor += 3;
        }

        if header.has_colors {
            if tokens.len() < cursor + 3 {
                return Err(IoError::format("PLY", "truncated color values"));
            }
            let rgb: Result<Vec<u8>, _> = tokens[cursor..cursor + 3]
                .iter()
                .map(|t| t.parse::<u8>())
                .collect();
            let rgb = rgb.map_err(|_| IoError::format("PLY", "invalid color value"))?;
            point.color = Some(PointColor::new(rgb[0], rgb[1], rgb[2]));
        }

        cloud.push(point);
    }

    Ok(cloud)
}

/// Loads a mesh from an ASCII PLY file.
///
/// Faces with more than three indices are fan-triangulated.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] for a missing file and
/// [`IoError::Format`] for malformed content.
pub fn load_mesh_ply<P: AsRef<Path>>(path: P) -> IoResult<WeldMesh> {
    let file = open(path.as_ref())?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header = parse_header(&mut lines)?;
    let mut mesh = WeldMesh::with_capacity(header.vertex_count, header.face_count);

    for _ in 0..header.vertex_count {
        let line = lines
            .next()
            .ok_or_else(|| IoError::format("PLY", "unexpected end of vertex data"))??;
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let xyz = parse_floats(&tokens, 3, "position")?;
        mesh.positions.push(Point3::new(xyz[0], xyz[1], xyz[2]));

        if header.has_normals {
            let n = parse_floats(&tokens[3..], 3, "normal")?;
            mesh.normals.push(Vector3::new(n[0], n[1], n[2]));
        } else {
            mesh.normals.push(Vector3::z());
        }
    }

    for _ in 0..header.face_count {
        let line = lines
            .next()
            .ok_or_else(|| IoError::format("PLY", "unexpected end of face data"))??;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            return Err(IoError::format("PLY", "empty face line"));
        }

        let count: usize = tokens[0]
            .parse()
            .map_err(|_| IoError::format("PLY", "invalid face index count"))?;
        if tokens.len() < count + 1 || count < 3 {
            return Err(IoError::format("PLY", "malformed face line"));
        }

        let indices: Result<Vec<u32>, _> =
            tokens[1..=count].iter().map(|t| t.parse::<u32>()).collect();
        let indices = indices.map_err(|_| IoError::format("PLY", "invalid face index"))?;

        for i in 1..count - 1 {
            mesh.triangles.push([indices[0], indices[i], indices[i + 1]]);
        }
    }

    if !mesh.indices_valid() {
        return Err(IoError::format("PLY", "face index out of range"));
    }

    Ok(mesh)
}

/// Saves a mesh as ASCII PLY with positions, normals, and faces.
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
/// seam_io::save_mesh_ply(&mesh, "out.ply").unwrap();
/// ```
pub fn save_mesh_ply<P: AsRef<Path>>(mesh: &WeldMesh, path: P) -> IoResult<()> {
    let file = std::fs::File::create(path)?;
    let mut w = BufWriter::new(file);

    writeln!(w, "ply")?;
    writeln!(w, "format ascii 1.0")?;
    writeln!(w, "element vertex {}", mesh.vertex_count())?;
    writeln!(w, "property float x")?;
    writeln!(w, "property float y")?;
    writeln!(w, "property float z")?;
    writeln!(w, "property float nx")?;
    writeln!(w, "property float ny")?;
    writeln!(w, "property float nz")?;
    writeln!(w, "element face {}", mesh.triangle_count())?;
    writeln!(w, "property list uchar int vertex_indices")?;
    writeln!(w, "end_header")?;

    for (p, n) in mesh.positions.iter().zip(mesh.normals.iter()) {
        writeln!(w, "{} {} {} {} {} {}", p.x, p.y, p.z, n.x, n.y, n.z)?;
    }

    for t in &mesh.triangles {
        writeln!(w, "3 {} {} {}", t[0], t[1], t[2])?;
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::tempdir;

    fn triangle_mesh() -> WeldMesh {
        let mut mesh = WeldMesh::new();
        mesh.positions.push(Point3::new(0.0, 0.0, 0.0));
        mesh.positions.push(Point3::new(1.5, 0.0, 0.0));
        mesh.positions.push(Point3::new(0.0, 2.5, 0.0));
        for _ in 0..3 {
            mesh.normals.push(Vector3::z());
        }
        mesh.triangles.push([0, 1, 2]);
        mesh
    }

    #[test]
    fn mesh_roundtrip_preserves_counts_and_positions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mesh.ply");

        let mesh = triangle_mesh();
        save_mesh_ply(&mesh, &path).unwrap();
        let loaded = load_mesh_ply(&path).unwrap();

        assert_eq!(loaded.vertex_count(), mesh.vertex_count());
        assert_eq!(loaded.triangle_count(), mesh.triangle_count());
        for (a, b) in loaded.positions.iter().zip(mesh.positions.iter()) {
            assert_relative_eq!(a.x, b.x);
            assert_relative_eq!(a.y, b.y);
            assert_relative_eq!(a.z, b.z);
        }
        assert_eq!(loaded.triangles, mesh.triangles);
    }

    #[test]
    fn cloud_with_normals_and_colors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cloud.ply");

        std::fs::write(
            &path,
            "ply\n\
             format ascii 1.0\n\
             element vertex 2\n\
             property float x\n\
             property float y\n\
             property float z\n\
             property float nx\n\
             property float ny\n\
             property float nz\n\
             property uchar red\n\
             property uchar green\n\
             property uchar blue\n\
             end_header\n\
             0 0 0 0 0 1 255 0 0\n\
             1 2 3 0 1 0 0 255 0\n",
        )
        .unwrap();

        let cloud = load_cloud_ply(&path).unwrap();
        assert_eq!(cloud.len(), 2);
        assert!(cloud.has_normals());
        assert!(cloud.has_colors());

        assert_relative_eq!(cloud.points[1].position.z, 3.0);
        assert_relative_eq!(cloud.points[1].normal.unwrap().y, 1.0);
        assert_eq!(cloud.points[0].color.unwrap().r, 255);
    }

    #[test]
    fn cloud_positions_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bare.ply");

        std::fs::write(
            &path,
            "ply\nformat ascii 1.0\nelement vertex 1\n\
             property float x\nproperty float y\nproperty float z\n\
             end_header\n0.5 0.25 -1\n",
        )
        .unwrap();

        let cloud = load_cloud_ply(&path).unwrap();
        assert_eq!(cloud.len(), 1);
        assert!(!cloud.has_normals());
        assert_relative_eq!(cloud.points[0].position.x, 0.5);
    }

    #[test]
    fn missing_file() {
        let err = load_cloud_ply("/no/such/file.ply").unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }

    #[test]
    fn rejects_binary_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("binary.ply");
        std::fs::write(&path, "ply\nformat binary_little_endian 1.0\nend_header\n").unwrap();

        let err = load_cloud_ply(&path).unwrap_err();
        assert!(matches!(err, IoError::Format { .. }));
    }

    #[test]
    fn rejects_truncated_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.ply");
        std::fs::write(
            &path,
            "ply\nformat ascii 1.0\nelement vertex 2\n\
             property float x\nproperty float y\nproperty float z\n\
             end_header\n0 0 0\n",
        )
        .unwrap();

        let err = load_cloud_ply(&path).unwrap_err();
        assert!(matches!(err, IoError::Format { .. }));
    }

    #[test]
    fn rejects_bad_face_index() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.ply");
        std::fs::write(
            &path,
            "ply\nformat ascii 1.0\nelement vertex 3\n\
             property float x\nproperty float y\nproperty float z\n\
             element face 1\nproperty list uchar int vertex_indices\n\
             end_header\n0 0 0\n1 0 0\n0 1 0\n3 0 1 9\n",
        )
        .unwrap();

        let err = load_mesh_ply(&path).unwrap_err();
        assert!(matches!(err, IoError::Format { .. }));
    }

    #[test]
    fn quad_faces_are_triangulated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quad.ply");
        std::fs::write(
            &path,
            "ply\nformat ascii 1.0\nelement vertex 4\n\
             property float x\nproperty float y\nproperty float z\n\
             element face 1\nproperty list uchar int vertex_indices\n\
             end_header\n0 0 0\n1 0 0\n1 1 0\n0 1 0\n4 0 1 2 3\n",
        )
        .unwrap();

        let mesh = load_mesh_ply(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
    }
}
