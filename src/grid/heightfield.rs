//! The `Grid` vertex arena.

use glam::{Vec2, Vec3};
use serde::Serialize;
use thiserror::Error;

use super::{GridCoord, Vertex};

/// Errors raised by checked grid access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Grid index out of range: ({row}, {col}) on a {size}x{size} grid")]
    IndexOutOfRange { row: usize, col: usize, size: usize },
}

/// Square heightfield of `N x N` vertices stored in row-major order.
///
/// `N = 2^depth + 1`. Vertex `(row, col)` starts at
/// `origin + (row * spacing.x, 0, col * spacing.y)`.
#[derive(Debug, Clone, Serialize)]
pub struct Grid {
    resolution: usize,
    origin: Vec3,
    spacing: Vec2,
    vertices: Vec<Vertex>,
}

impl Grid {
    /// Creates a flat grid covering `size` (X by Z), centered on the world origin.
    ///
    /// # Arguments
    /// * `recursion_depth` - Subdivision depth; the grid is `2^depth + 1` wide
    /// * `size` - Physical extent along X (`size.x`) and Z (`size.y`)
    ///
    /// # Panics
    /// Panics if `2^recursion_depth` overflows `usize`. Public construction goes
    /// through [`Terrain`](crate::Terrain), which validates the depth first.
    pub(crate) fn new(recursion_depth: u32, size: Vec2) -> Self {
        let resolution = Self::resolution_for_depth(recursion_depth);
        let origin = Vec3::new(-size.x / 2.0, 0.0, -size.y / 2.0);
        let cells = (resolution - 1) as f32;
        let spacing = Vec2::new(size.x / cells, size.y / cells);

        let mut vertices = Vec::with_capacity(resolution * resolution);
        for row in 0..resolution {
            for col in 0..resolution {
                let offset = Vec3::new(row as f32 * spacing.x, 0.0, col as f32 * spacing.y);
                vertices.push(Vertex::at(origin + offset));
            }
        }

        Self {
            resolution,
            origin,
            spacing,
            vertices,
        }
    }

    /// Number of vertices along each side for the given recursion depth.
    ///
    /// # Panics
    /// Panics if `recursion_depth >= usize::BITS`.
    pub const fn resolution_for_depth(recursion_depth: u32) -> usize {
        assert!(recursion_depth < usize::BITS, "recursion depth overflows usize");
        (1usize << recursion_depth) + 1
    }

    /// Vertices along each side (`N`).
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Total number of vertices (`N^2`).
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of quad cells (`(N-1)^2`).
    pub fn cell_count(&self) -> usize {
        (self.resolution - 1) * (self.resolution - 1)
    }

    /// World position of vertex `(0, 0)`.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Distance between neighboring vertices along X (`x`) and Z (`y`).
    pub fn spacing(&self) -> Vec2 {
        self.spacing
    }

    /// The four outer corners, top-left first.
    pub fn corners(&self) -> [GridCoord; 4] {
        let last = self.resolution - 1;
        [
            GridCoord::new(0, 0),
            GridCoord::new(0, last),
            GridCoord::new(last, 0),
            GridCoord::new(last, last),
        ]
    }

    /// Returns true if the (possibly negative) coordinate lies inside the grid.
    pub fn is_valid(&self, row: isize, col: isize) -> bool {
        let n = self.resolution as isize;
        (0..n).contains(&row) && (0..n).contains(&col)
    }

    /// Flat row-major index of `(row, col)`, or an error when out of range.
    pub fn checked_index(&self, row: usize, col: usize) -> Result<usize, GridError> {
        if row < self.resolution && col < self.resolution {
            Ok(row * self.resolution + col)
        } else {
            Err(GridError::IndexOutOfRange {
                row,
                col,
                size: self.resolution,
            })
        }
    }

    /// Flat row-major index of `(row, col)`.
    ///
    /// # Panics
    /// Panics if the coordinate is out of range.
    pub fn index(&self, row: usize, col: usize) -> usize {
        match self.checked_index(row, col) {
            Ok(i) => i,
            Err(e) => panic!("{e}"),
        }
    }

    /// Returns the vertex at `(row, col)`.
    ///
    /// # Panics
    /// Panics if the coordinate is out of range; only generation code indexes
    /// the grid, so this is a logic error rather than bad input.
    pub fn get(&self, row: usize, col: usize) -> &Vertex {
        &self.vertices[self.index(row, col)]
    }

    /// Mutable access to the vertex at `(row, col)`.
    ///
    /// # Panics
    /// Panics if the coordinate is out of range.
    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut Vertex {
        let i = self.index(row, col);
        &mut self.vertices[i]
    }

    /// Checked variant of [`get`](Self::get).
    pub fn try_get(&self, row: usize, col: usize) -> Result<&Vertex, GridError> {
        self.checked_index(row, col).map(|i| &self.vertices[i])
    }

    /// Vertex at `coord`; panics like [`get`](Self::get).
    pub fn at(&self, coord: GridCoord) -> &Vertex {
        self.get(coord.row, coord.col)
    }

    /// Mutable vertex at `coord`; panics like [`get_mut`](Self::get_mut).
    pub fn at_mut(&mut self, coord: GridCoord) -> &mut Vertex {
        self.get_mut(coord.row, coord.col)
    }

    /// All vertices in row-major order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub(crate) fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }

    /// Returns true once every vertex has a committed height.
    pub fn all_finalized(&self) -> bool {
        self.vertices.iter().all(|v| v.finalized)
    }

    /// Returns (min, max) of the vertex heights.
    pub fn height_range(&self) -> (f32, f32) {
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for v in &self.vertices {
            min = min.min(v.position.y);
            max = max.max(v.position.y);
        }
        (min, max)
    }

    /// Vertex heights in row-major order.
    pub fn heights(&self) -> Vec<f32> {
        self.vertices.iter().map(|v| v.position.y).collect()
    }

    /// Returns an iterator over all coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        let n = self.resolution;
        (0..n).flat_map(move |row| (0..n).map(move |col| GridCoord::new(row, col)))
    }
}
