//! Per-vertex normal estimation from neighboring edge vectors.

use glam::{DVec3, Vec3};
use rayon::prelude::*;

use crate::grid::Grid;

/// Neighbor pairs in cyclic order as `(row, col)` offsets:
/// (west, north), (north, east), (east, south), (south, west).
///
/// Rows run along +X and columns along +Z, so with the edge order used in
/// [`vertex_normal`] each pair yields a +Y normal on a flat grid.
const NEIGHBOR_PAIRS: [((isize, isize), (isize, isize)); 4] = [
    ((-1, 0), (0, -1)),
    ((0, -1), (1, 0)),
    ((1, 0), (0, 1)),
    ((0, 1), (-1, 0)),
];

/// Computes the normal of every vertex and stores it on the grid.
///
/// Normals are derived from a read-only snapshot of positions, so rows are
/// processed in parallel before being written back.
pub fn estimate_normals(grid: &mut Grid) {
    let normals: Vec<Vec3> = {
        let frozen: &Grid = grid;
        let n = frozen.resolution();
        (0..frozen.vertex_count())
            .into_par_iter()
            .map(|i| vertex_normal(frozen, i / n, i % n))
            .collect()
    };

    for (vertex, normal) in grid.vertices_mut().iter_mut().zip(normals) {
        vertex.normal = normal;
    }
}

/// Averaged, normalized normal at `(row, col)`.
///
/// Sums `cross(center - first, second - center)` over every neighbor pair
/// whose two members are both inside the grid. Accumulates in f64: cell-area
/// products of very large or very small extents leave the f32 range.
pub fn vertex_normal(grid: &Grid, row: usize, col: usize) -> Vec3 {
    let center = grid.get(row, col).position.as_dvec3();
    let sum: DVec3 = neighbor_pairs(grid, row, col)
        .map(|(first, second)| (center - first.as_dvec3()).cross(second.as_dvec3() - center))
        .sum();
    sum.normalize_or_zero().as_vec3()
}

/// Number of neighbor pairs contributing to the normal at `(row, col)`.
///
/// Corners have 1, edges 2, interior vertices 4.
pub fn contributing_pairs(grid: &Grid, row: usize, col: usize) -> usize {
    neighbor_pairs(grid, row, col).count()
}

fn neighbor_pairs(grid: &Grid, row: usize, col: usize) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
    let (r, c) = (row as isize, col as isize);
    NEIGHBOR_PAIRS.into_iter().filter_map(move |((dr1, dc1), (dr2, dc2))| {
        let (r1, c1) = (r + dr1, c + dc1);
        let (r2, c2) = (r + dr2, c + dc2);
        if !grid.is_valid(r1, c1) || !grid.is_valid(r2, c2) {
            return None;
        }
        let first = grid.get(r1 as usize, c1 as usize).position;
        let second = grid.get(r2 as usize, c2 as usize).position;
        Some((first, second))
    })
}
