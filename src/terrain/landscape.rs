//! The `Terrain` value: a validated config, its seed and the generated grid.

use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::{debug, info};

use crate::grid::Grid;
use crate::mesh::Mesh;
use crate::pipeline::{Pipeline, PipelineError};
use crate::rng::GaussianSource;
use super::config::{ConfigError, TerrainConfig};
use super::diamond_square::{displace_grid, GenerationStats};
use super::normals::estimate_normals;
use super::triangulate::triangulate;

/// Errors that can occur while building a terrain.
#[derive(Error, Debug)]
pub enum TerrainError {
    #[error("Invalid terrain configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("Generation failed: {0}")]
    Pipeline(#[from] PipelineError),
}

/// A procedurally generated heightfield.
#[derive(Debug, Clone)]
pub struct Terrain {
    config: TerrainConfig,
    seed: u64,
    grid: Grid,
    source: GaussianSource,
    stats: GenerationStats,
}

impl Terrain {
    /// Validates `config` and generates a terrain with displaced heights and
    /// normals.
    ///
    /// # Arguments
    /// * `config` - Terrain parameters
    /// * `seed` - Random seed; the same seed and config reproduce the same terrain
    pub fn new(config: TerrainConfig, seed: u64) -> Result<Self, TerrainError> {
        let mut terrain = Self::flat(config, seed)?;

        Pipeline::standard().run_with_callbacks(
            &mut terrain,
            |name, i, total| debug!("[{}/{}] starting {}", i + 1, total, name),
            |name, i, total| debug!("[{}/{}] completed {}", i + 1, total, name),
        )?;

        let (min, max) = terrain.height_range();
        info!(
            seed,
            resolution = terrain.grid.resolution(),
            min_height = min,
            max_height = max,
            "terrain generated"
        );
        Ok(terrain)
    }

    /// Like [`Terrain::new`] but seeded from the wall clock.
    pub fn with_random_seed(config: TerrainConfig) -> Result<Self, TerrainError> {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::new(config, seed)
    }

    /// Validates `config` and allocates a flat, undisplaced grid.
    ///
    /// Use with a custom [`Pipeline`] to run generation stages manually.
    pub fn flat(config: TerrainConfig, seed: u64) -> Result<Self, TerrainError> {
        config.validate()?;
        let grid = Grid::new(config.recursion_depth, config.size);
        Ok(Self {
            config,
            seed,
            grid,
            source: GaussianSource::new(seed),
            stats: GenerationStats::default(),
        })
    }

    /// The validated configuration this terrain was built from.
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Seed of the Gaussian stream.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The generated grid. Read-only once generation has finished.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Counters from the pass that displaced the grid.
    pub fn stats(&self) -> GenerationStats {
        self.stats
    }

    /// Returns true once every vertex height is committed.
    pub fn is_displaced(&self) -> bool {
        self.grid.all_finalized()
    }

    /// Returns (min, max) vertex height.
    pub fn height_range(&self) -> (f32, f32) {
        self.grid.height_range()
    }

    /// Triangle-list indices over the grid.
    pub fn indices(&self) -> Vec<u32> {
        triangulate(&self.grid)
    }

    /// Packages positions, normals and indices for a rendering backend.
    pub fn mesh(&self) -> Mesh {
        Mesh::from_grid(&self.grid)
    }

    /// Runs diamond-square unless every height is already committed, in which
    /// case the generating pass's counters are kept.
    pub(crate) fn displace(&mut self) -> GenerationStats {
        if self.is_displaced() {
            return self.stats;
        }
        self.stats = displace_grid(&mut self.grid, &self.config, &mut self.source);
        self.stats
    }

    pub(crate) fn compute_normals(&mut self) {
        estimate_normals(&mut self.grid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};

    fn small(depth: u32) -> TerrainConfig {
        TerrainConfig {
            size: Vec2::new(3.0, 3.0),
            recursion_depth: depth,
            ..Default::default()
        }
    }

    #[test]
    fn test_terrain_creation() {
        let terrain = Terrain::new(small(4), 42).unwrap();
        assert_eq!(terrain.seed(), 42);
        assert_eq!(terrain.grid().resolution(), 17);
        assert!(terrain.is_displaced());

        let (min, max) = terrain.height_range();
        assert!(min < max, "Should have height variation");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TerrainConfig {
            fractal_dimension: 3.5,
            ..small(2)
        };
        let err = Terrain::new(config, 1).unwrap_err();
        assert!(matches!(
            err,
            TerrainError::InvalidConfig(ConfigError::InvalidFractalDimension(_))
        ));
    }

    #[test]
    fn test_flat_is_undisplaced() {
        let terrain = Terrain::flat(small(3), 5).unwrap();
        assert!(!terrain.is_displaced());
        assert_eq!(terrain.height_range(), (0.0, 0.0));
        assert_eq!(terrain.stats(), GenerationStats::default());
    }

    #[test]
    fn test_reproducibility() {
        let a = Terrain::new(small(6), 1234).unwrap();
        let b = Terrain::new(small(6), 1234).unwrap();
        for (va, vb) in a.grid().vertices().iter().zip(b.grid().vertices()) {
            assert_eq!(va.position.to_array(), vb.position.to_array());
            assert_eq!(va.normal.to_array(), vb.normal.to_array());
        }
    }

    #[test]
    fn test_sizes_for_depth() {
        for depth in 0..=6u32 {
            let terrain = Terrain::new(small(depth), 3).unwrap();
            let side = (1usize << depth) + 1;
            assert_eq!(terrain.grid().vertex_count(), side * side);
            assert_eq!(terrain.indices().len(), 6 * (1 << depth) * (1 << depth));
        }
    }

    #[test]
    fn test_sample_count_matches_unique_midpoints() {
        let terrain = Terrain::new(small(5), 77).unwrap();
        let n = terrain.grid().vertex_count() as u64;
        assert_eq!(terrain.stats().samples_drawn, n - 4);
        assert_eq!(terrain.stats().points_displaced, n - 4);
    }

    #[test]
    fn test_normals_are_unit_length() {
        let terrain = Terrain::new(small(5), 8).unwrap();
        for v in terrain.grid().vertices() {
            assert!((v.normal.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_diagonal_corners() {
        let config = TerrainConfig {
            size: Vec2::new(4.0, 2.0),
            recursion_depth: 3,
            ..Default::default()
        };
        let terrain = Terrain::new(config.clone(), 21).unwrap();
        let grid = terrain.grid();
        let last = grid.resolution() - 1;

        let origin = Vec3::new(-2.0, 0.0, -1.0);
        assert_eq!(grid.get(0, 0).position, origin);

        let far = grid.get(last, last).position;
        let expected = origin + Vec3::new(config.size.x, 0.0, config.size.y);
        assert!((far - expected).length() < 1e-5);
    }

    #[test]
    fn test_depth_one_scenario() {
        let terrain = Terrain::new(small(1), 10).unwrap();
        let grid = terrain.grid();
        assert_eq!(grid.vertex_count(), 9);
        assert_eq!(grid.cell_count(), 4);
        assert_eq!(terrain.indices().len(), 24);
        assert_eq!(terrain.stats().points_displaced, 5);
        for corner in grid.corners() {
            assert_eq!(grid.at(corner).position.y, 0.0);
        }
    }

    #[test]
    fn test_rerunning_pipeline_keeps_stats() {
        let mut terrain = Terrain::new(small(3), 9).unwrap();
        let before = terrain.stats();
        let heights = terrain.grid().heights();

        Pipeline::standard().run(&mut terrain).unwrap();

        assert_eq!(terrain.stats(), before);
        assert_eq!(terrain.stats().samples_drawn, 81 - 4);
        assert_eq!(terrain.grid().heights(), heights);
    }

    #[test]
    fn test_extreme_sizes_give_unit_normals() {
        let large = TerrainConfig {
            size: Vec2::splat(1e20),
            fractal_dimension: 2.99,
            recursion_depth: 2,
            ..Default::default()
        };
        let tiny = TerrainConfig {
            size: Vec2::splat(1e-20),
            recursion_depth: 4,
            ..Default::default()
        };
        for config in [large, tiny] {
            let terrain = Terrain::new(config, 4).unwrap();
            for v in terrain.grid().vertices() {
                assert!((v.normal.length() - 1.0).abs() < 1e-5, "normal {:?}", v.normal);
            }
        }
    }

    #[test]
    fn test_random_seed_wrapper() {
        let terrain = Terrain::with_random_seed(small(2)).unwrap();
        assert!(terrain.is_displaced());
    }
}
