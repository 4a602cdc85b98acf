//! Vertex and index buffers.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::Grid;
use crate::terrain::triangulate;

/// Errors raised when assembling a mesh from raw buffers.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MeshError {
    #[error("Index count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),
    #[error("Index {index} out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds { index: u32, vertex_count: usize },
}

/// Interleaved GPU vertex: position then normal, tightly packed.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    /// Size of one vertex in bytes.
    pub const STRIDE: usize = std::mem::size_of::<MeshVertex>();
    /// Byte offset of `position` (attribute 0).
    pub const POSITION_OFFSET: usize = std::mem::offset_of!(MeshVertex, position);
    /// Byte offset of `normal` (attribute 1).
    pub const NORMAL_OFFSET: usize = std::mem::offset_of!(MeshVertex, normal);

    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// Immutable triangle mesh.
///
/// Deserialization goes through [`Mesh::new`], so a decoded mesh carries the
/// same index guarantees as a constructed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MeshBuffers")]
pub struct Mesh {
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
}

/// Unchecked wire form of a [`Mesh`].
#[derive(Deserialize)]
struct MeshBuffers {
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
}

impl TryFrom<MeshBuffers> for Mesh {
    type Error = MeshError;

    fn try_from(buffers: MeshBuffers) -> Result<Self, Self::Error> {
        Mesh::new(buffers.vertices, buffers.indices)
    }
}

impl Mesh {
    /// Builds a mesh from raw buffers, checking every index.
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangle(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(MeshError::IndexOutOfBounds {
                index,
                vertex_count: vertices.len(),
            });
        }
        Ok(Self { vertices, indices })
    }

    /// Packages a generated grid: vertices in row-major order, two triangles per cell.
    pub fn from_grid(grid: &Grid) -> Self {
        let vertices = grid
            .vertices()
            .par_iter()
            .map(|v| MeshVertex::new(v.position, v.normal))
            .collect();
        Self {
            vertices,
            indices: triangulate(grid),
        }
    }

    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    /// Triangle list, three indices per triangle.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex buffer as raw bytes for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer as raw bytes for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Iterates triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Axis-aligned bounds as (min, max), or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = Vec3::from_array(self.vertices.first()?.position);
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            let p = Vec3::from_array(v.position);
            (min.min(p), max.max(p))
        }))
    }

    /// Consumes the mesh, returning its vertex and index buffers.
    pub fn into_parts(self) -> (Vec<MeshVertex>, Vec<u32>) {
        (self.vertices, self.indices)
    }
}
