//! Wavefront OBJ export of a generated mesh.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

use crate::mesh::Mesh;

/// Errors that can occur during OBJ export.
#[derive(Error, Debug)]
pub enum ObjExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes `mesh` as OBJ text: one `v` and `vn` per vertex, `f a//a b//b c//c` per triangle.
pub fn write_obj<W: Write>(mesh: &Mesh, mut writer: W) -> Result<(), ObjExportError> {
    writeln!(writer, "# {} vertices, {} triangles", mesh.vertex_count(), mesh.triangle_count())?;

    for v in mesh.vertices() {
        let [x, y, z] = v.position;
        writeln!(writer, "v {} {} {}", x, y, z)?;
    }
    for v in mesh.vertices() {
        let [x, y, z] = v.normal;
        writeln!(writer, "vn {} {} {}", x, y, z)?;
    }
    // OBJ indices are 1-based.
    for [a, b, c] in mesh.triangles() {
        let (a, b, c) = (a + 1, b + 1, c + 1);
        writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
    }

    writer.flush()?;
    Ok(())
}

/// Exports `mesh` to an OBJ file at `path`.
pub fn export_mesh_obj(mesh: &Mesh, path: &Path) -> Result<(), ObjExportError> {
    let file = File::create(path)?;
    write_obj(mesh, BufWriter::new(file))
}
