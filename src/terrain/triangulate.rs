//! Triangle-list indices over the grid cells.

use crate::grid::Grid;

/// `(row, col)` offsets of the six indices emitted per cell.
///
/// Both triangles wind counter-clockwise when seen from +Y, matching the
/// normals produced by the normal estimator.
const CELL_OFFSETS: [(usize, usize); 6] = [(1, 0), (0, 0), (1, 1), (1, 1), (0, 0), (0, 1)];

/// Emits two triangles per cell, `6 * (N-1)^2` indices in total.
pub fn triangulate(grid: &Grid) -> Vec<u32> {
    let cells_per_side = grid.resolution() - 1;
    let mut indices = Vec::with_capacity(6 * grid.cell_count());

    for row in 0..cells_per_side {
        for col in 0..cells_per_side {
            for (dr, dc) in CELL_OFFSETS {
                indices.push(grid.index(row + dr, col + dc) as u32);
            }
        }
    }

    indices
}

/// Number of indices produced for a grid of the given recursion depth.
pub const fn index_count_for_depth(recursion_depth: u32) -> usize {
    let cells = 1usize << recursion_depth;
    6 * cells * cells
}
