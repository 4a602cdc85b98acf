//! Recursive midpoint displacement (diamond-square) over a [`Grid`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grid::{Grid, GridCoord};
use crate::rng::GaussianSource;
use super::config::TerrainConfig;

/// Counters collected during one displacement pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Every quadrant call, root included.
    pub quadrants_visited: u64,
    /// Quadrant calls made at depth 0.
    pub leaf_quadrants: u64,
    /// Vertices whose height was committed by a displacement.
    pub points_displaced: u64,
    /// Gaussian samples consumed.
    pub samples_drawn: u64,
}

/// Displaces every vertex of `grid` exactly once.
///
/// The outer corners are committed at their initial plane height by the root
/// call; every other vertex is displaced from the mean of its quadrant's
/// corners (centers) or edge endpoints (edge midpoints).
///
/// # Arguments
/// * `grid` - Flat grid sized for `config.recursion_depth`
/// * `config` - Roughness and height scale
/// * `source` - Random stream; consumed in a fixed order so runs are reproducible
pub fn displace_grid(
    grid: &mut Grid,
    config: &TerrainConfig,
    source: &mut GaussianSource,
) -> GenerationStats {
    let depth = config.recursion_depth;
    debug_assert_eq!(grid.resolution(), Grid::resolution_for_depth(depth));

    let samples_before = source.samples_drawn();
    let last = grid.resolution() - 1;

    let mut generator = DiamondSquare {
        grid,
        config,
        source,
        stats: GenerationStats::default(),
    };
    generator.commit_corners();
    generator.subdivide(depth, GridCoord::new(0, 0), GridCoord::new(last, last));

    let mut stats = generator.stats;
    stats.samples_drawn = generator.source.samples_drawn() - samples_before;

    debug!(
        depth,
        quadrants = stats.quadrants_visited,
        leaves = stats.leaf_quadrants,
        displaced = stats.points_displaced,
        samples = stats.samples_drawn,
        "diamond-square pass complete"
    );
    stats
}

struct DiamondSquare<'a> {
    grid: &'a mut Grid,
    config: &'a TerrainConfig,
    source: &'a mut GaussianSource,
    stats: GenerationStats,
}

impl DiamondSquare<'_> {
    fn commit_corners(&mut self) {
        for corner in self.grid.corners() {
            self.grid.at_mut(corner).finalized = true;
        }
    }

    fn subdivide(&mut self, depth: u32, top_left: GridCoord, bottom_right: GridCoord) {
        self.stats.quadrants_visited += 1;

        let center = top_left.midpoint(bottom_right);
        let top_right = GridCoord::new(top_left.row, bottom_right.col);
        let bottom_left = GridCoord::new(bottom_right.row, top_left.col);
        let top_mid = GridCoord::new(top_left.row, center.col);
        let left_mid = GridCoord::new(center.row, top_left.col);
        let bottom_mid = GridCoord::new(bottom_right.row, center.col);
        let right_mid = GridCoord::new(center.row, bottom_right.col);

        // A unit cell has no interior midpoints: every point it names is a corner.
        if bottom_right.row - top_left.row >= 2 {
            // X is never displaced, so this is the undisplaced plane extent.
            let length = self.grid.at(bottom_right).position.x - self.grid.at(top_left).position.x;

            let corners = self.mean_height(&[top_left, top_right, bottom_left, bottom_right]);
            self.displace(center, corners, length);

            let half = length / 2.0;
            let top = self.mean_height(&[top_left, top_right]);
            self.displace(top_mid, top, half);
            let left = self.mean_height(&[top_left, bottom_left]);
            self.displace(left_mid, left, half);
            let bottom = self.mean_height(&[bottom_left, bottom_right]);
            self.displace(bottom_mid, bottom, half);
            let right = self.mean_height(&[top_right, bottom_right]);
            self.displace(right_mid, right, half);
        }

        if depth > 0 {
            self.subdivide(depth - 1, top_left, center);
            self.subdivide(depth - 1, top_mid, right_mid);
            self.subdivide(depth - 1, left_mid, bottom_mid);
            self.subdivide(depth - 1, center, bottom_right);
        } else {
            self.stats.leaf_quadrants += 1;
        }
    }

    fn mean_height(&self, coords: &[GridCoord]) -> f32 {
        let sum: f32 = coords.iter().map(|&c| self.grid.at(c).position.y).sum();
        sum / coords.len() as f32
    }

    fn displace(&mut self, coord: GridCoord, mean: f32, segment_length: f32) {
        let variance = self.config.variance(segment_length);
        let vertex = self.grid.at_mut(coord);
        if vertex.finalized {
            return;
        }
        vertex.position.y = self.source.sample(mean, variance);
        vertex.finalized = true;
        self.stats.points_displaced += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn config(depth: u32) -> TerrainConfig {
        TerrainConfig {
            size: Vec2::new(4.0, 4.0),
            recursion_depth: depth,
            ..Default::default()
        }
    }

    fn run(depth: u32, seed: u64) -> (Grid, GenerationStats) {
        let config = config(depth);
        let mut grid = Grid::new(depth, config.size);
        let mut source = GaussianSource::new(seed);
        let stats = displace_grid(&mut grid, &config, &mut source);
        (grid, stats)
    }

    #[test]
    fn test_depth_one_displaces_five_points() {
        let (grid, stats) = run(1, 42);
        assert_eq!(grid.resolution(), 3);
        assert_eq!(stats.points_displaced, 5);
        assert_eq!(stats.samples_drawn, 5);
        assert_eq!(stats.leaf_quadrants, 4);

        for corner in grid.corners() {
            assert_eq!(grid.at(corner).position.y, 0.0);
        }
        assert!(grid.all_finalized());
    }

    #[test]
    fn test_every_point_displaced_once() {
        for depth in 1..=6 {
            let (grid, stats) = run(depth, 7);
            let n = grid.resolution() as u64;
            assert!(grid.all_finalized(), "depth {} left points unfinalized", depth);
            assert_eq!(stats.points_displaced, n * n - 4);
            assert_eq!(stats.samples_drawn, n * n - 4, "shared midpoints were resampled");
        }
    }

    #[test]
    fn test_leaf_quadrant_count() {
        for depth in 0..=5 {
            let (_, stats) = run(depth, 1);
            assert_eq!(stats.leaf_quadrants, 4u64.pow(depth));
            let total: u64 = (0..=depth).map(|d| 4u64.pow(d)).sum();
            assert_eq!(stats.quadrants_visited, total);
        }
    }

    #[test]
    fn test_depth_zero_is_flat() {
        let (grid, stats) = run(0, 3);
        assert_eq!(grid.vertex_count(), 4);
        assert_eq!(stats.samples_drawn, 0);
        assert!(grid.all_finalized());
        assert!(grid.vertices().iter().all(|v| v.position.y == 0.0));
    }

    #[test]
    fn test_corners_preserved() {
        let (grid, _) = run(5, 2024);
        for corner in grid.corners() {
            assert_eq!(grid.at(corner).position.y, 0.0);
        }
    }

    #[test]
    fn test_only_height_changes() {
        let config = config(4);
        let flat = Grid::new(4, config.size);
        let (grid, _) = run(4, 11);
        for (a, b) in flat.vertices().iter().zip(grid.vertices()) {
            assert_eq!(a.position.x, b.position.x);
            assert_eq!(a.position.z, b.position.z);
        }
    }

    #[test]
    fn test_determinism() {
        let (a, _) = run(6, 99);
        let (b, _) = run(6, 99);
        for (va, vb) in a.vertices().iter().zip(b.vertices()) {
            assert_eq!(va.position.to_array(), vb.position.to_array());
        }
    }

    #[test]
    fn test_seed_changes_terrain() {
        let (a, _) = run(4, 1);
        let (b, _) = run(4, 2);
        assert!(a
            .vertices()
            .iter()
            .zip(b.vertices())
            .any(|(va, vb)| va.position.y != vb.position.y));
    }

    #[test]
    fn test_zero_height_factor_stays_flat() {
        let config = TerrainConfig {
            height_factor: 0.0,
            ..config(4)
        };
        let mut grid = Grid::new(4, config.size);
        let mut source = GaussianSource::new(5);
        displace_grid(&mut grid, &config, &mut source);
        assert!(grid.vertices().iter().all(|v| v.position.y == 0.0));
    }

    #[test]
    fn test_finalized_points_are_not_redisplaced() {
        let config = config(2);
        let mut grid = Grid::new(2, config.size);
        grid.get_mut(2, 2).position.y = 5.0;
        grid.get_mut(2, 2).finalized = true;

        let mut source = GaussianSource::new(8);
        let stats = displace_grid(&mut grid, &config, &mut source);

        assert_eq!(grid.get(2, 2).position.y, 5.0);
        assert_eq!(stats.points_displaced, 25 - 4 - 1);
    }

    #[test]
    fn test_second_pass_is_a_no_op() {
        let config = config(3);
        let mut grid = Grid::new(3, config.size);
        let mut source = GaussianSource::new(13);
        displace_grid(&mut grid, &config, &mut source);
        let snapshot = grid.heights();

        let stats = displace_grid(&mut grid, &config, &mut source);
        assert_eq!(stats.points_displaced, 0);
        assert_eq!(stats.samples_drawn, 0);
        assert_eq!(grid.heights(), snapshot);
    }
}
