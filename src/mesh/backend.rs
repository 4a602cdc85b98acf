//! Seam to the rendering collaborator.

use super::Mesh;

/// A rendering backend that takes ownership of GPU-side buffers.
///
/// Implementors upload [`Mesh::vertex_bytes`] and [`Mesh::index_bytes`],
/// describe the layout with [`MeshVertex::STRIDE`](super::MeshVertex::STRIDE)
/// and [`MeshVertex::NORMAL_OFFSET`](super::MeshVertex::NORMAL_OFFSET), and
/// draw [`Mesh::index_count`] indices as a triangle list.
pub trait RenderBackend {
    type Error;

    fn upload(&mut self, mesh: &Mesh) -> Result<(), Self::Error>;
}
