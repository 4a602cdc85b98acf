//! Configuration for diamond-square terrain generation.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::Grid;

/// Default roughness; 2.45 gives hilly but not jagged terrain.
pub const DEFAULT_FRACTAL_DIMENSION: f32 = 2.45;
/// Default number of subdivision levels (513x513 grid).
pub const DEFAULT_RECURSION_DEPTH: u32 = 9;
/// Default scale applied to every displacement variance.
pub const DEFAULT_HEIGHT_FACTOR: f32 = 0.3;
/// Largest grid accepted, in vertices. Depth 11 (2049x2049) fits, depth 12 does not.
pub const MAX_VERTICES: u64 = 1 << 24;
/// Multiple of the root variance that heights must be able to reach without
/// overflowing f32; covers the offsets summed across every subdivision level.
const HEIGHT_HEADROOM: f32 = 1.0e3;

/// Errors raised while building or loading a [`TerrainConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid terrain size: ({0}, {1}) (both extents must be finite and > 0)")]
    InvalidSize(f32, f32),
    #[error("Invalid fractal dimension: {0} (must be in (2, 3])")]
    InvalidFractalDimension(f32),
    #[error("Invalid height factor: {0} (must be finite and >= 0)")]
    InvalidHeightFactor(f32),
    #[error("Recursion depth {depth} exceeds the vertex budget of {budget}")]
    DepthExceedsBudget { depth: u32, budget: u64 },
    #[error("Displacement variance is not finite for segment length {0}")]
    NonFiniteVariance(f32),
    #[error("Grid spacing ({0}, {1}) is below the smallest normal f32")]
    DegenerateSpacing(f32, f32),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Parameters controlling the generated heightfield.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Physical extent along X (`x`) and Z (`y`).
    pub size: Vec2,
    /// Roughness in (2, 3]. Higher values decay variance faster and give smoother terrain.
    pub fractal_dimension: f32,
    /// Subdivision levels; the grid is `2^depth + 1` vertices wide.
    pub recursion_depth: u32,
    /// Scale applied to the displacement variance.
    pub height_factor: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: Vec2::splat(3.0),
            fractal_dimension: DEFAULT_FRACTAL_DIMENSION,
            recursion_depth: DEFAULT_RECURSION_DEPTH,
            height_factor: DEFAULT_HEIGHT_FACTOR,
        }
    }
}

impl TerrainConfig {
    /// Creates a default configuration covering `size`.
    pub fn with_size(size: Vec2) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    /// Creates a jagged, mountainous configuration.
    pub fn rugged(size: Vec2) -> Self {
        Self {
            size,
            fractal_dimension: 2.2,
            height_factor: 0.4,
            ..Default::default()
        }
    }

    /// Creates a gently rolling configuration.
    pub fn smooth(size: Vec2) -> Self {
        Self {
            size,
            fractal_dimension: 2.8,
            height_factor: 0.2,
            ..Default::default()
        }
    }

    /// Parses a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Displacement variance for a segment of physical length `segment_length`.
    ///
    /// `variance(L) = L^(2 (3 - D)) * height_factor`.
    pub fn variance(&self, segment_length: f32) -> f32 {
        segment_length.powf(2.0 * (3.0 - self.fractal_dimension)) * self.height_factor
    }

    /// Vertices per side for this configuration.
    ///
    /// # Panics
    /// Panics if `recursion_depth` does not fit a `usize` shift; call
    /// [`validate`](Self::validate) first.
    pub fn resolution(&self) -> usize {
        Grid::resolution_for_depth(self.recursion_depth)
    }

    /// Checks every parameter, rejecting values that would produce NaN heights
    /// or an unbounded allocation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Vec2 { x, y } = self.size;
        if !(x.is_finite() && y.is_finite() && x > 0.0 && y > 0.0) {
            return Err(ConfigError::InvalidSize(x, y));
        }

        let d = self.fractal_dimension;
        if !(d.is_finite() && d > 2.0 && d <= 3.0) {
            return Err(ConfigError::InvalidFractalDimension(d));
        }

        let h = self.height_factor;
        if !(h.is_finite() && h >= 0.0) {
            return Err(ConfigError::InvalidHeightFactor(h));
        }

        match vertex_count_for_depth(self.recursion_depth) {
            Some(count) if count <= MAX_VERTICES => {}
            _ => {
                return Err(ConfigError::DepthExceedsBudget {
                    depth: self.recursion_depth,
                    budget: MAX_VERTICES,
                })
            }
        }

        // Neighboring vertices must stay distinct after centering on the origin.
        let cells = (self.resolution() - 1) as f32;
        let (dx, dz) = (x / cells, y / cells);
        if !(dx.is_normal() && dz.is_normal()) {
            return Err(ConfigError::DegenerateSpacing(dx, dz));
        }

        // The root quadrant has the largest segment, so its variance bounds all others.
        let variance = self.variance(x);
        if !(variance * HEIGHT_HEADROOM).is_finite() {
            return Err(ConfigError::NonFiniteVariance(x));
        }

        Ok(())
    }
}

/// Number of grid vertices for `depth`, or `None` on overflow.
pub fn vertex_count_for_depth(depth: u32) -> Option<u64> {
    let side = 1u64.checked_shl(depth)?.checked_add(1)?;
    side.checked_mul(side)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TerrainConfig::default();
        assert_eq!(config.recursion_depth, 9);
        assert!((config.fractal_dimension - 2.45).abs() < 1e-6);
        assert!((config.height_factor - 0.3).abs() < 1e-6);
        assert_eq!(config.resolution(), 513);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        let size = Vec2::new(10.0, 5.0);
        for config in [
            TerrainConfig::with_size(size),
            TerrainConfig::rugged(size),
            TerrainConfig::smooth(size),
        ] {
            assert_eq!(config.size, size);
            assert!(config.validate().is_ok());
        }
        assert!(TerrainConfig::rugged(size).fractal_dimension < TerrainConfig::smooth(size).fractal_dimension);
    }

    #[test]
    fn test_variance_schedule() {
        let config = TerrainConfig {
            fractal_dimension: 2.5,
            height_factor: 0.5,
            ..Default::default()
        };
        // Exponent 2 * (3 - 2.5) = 1.
        assert!((config.variance(4.0) - 2.0).abs() < 1e-6);
        assert!((config.variance(1.0) - 0.5).abs() < 1e-6);
        assert!(config.variance(2.0) < config.variance(4.0));
    }

    #[test]
    fn test_dimension_three_is_scale_invariant() {
        let config = TerrainConfig {
            fractal_dimension: 3.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.variance(8.0), config.variance(0.125));
    }

    #[test]
    fn test_rejects_bad_fractal_dimension() {
        for d in [2.0, 1.5, 3.01, f32::NAN] {
            let config = TerrainConfig {
                fractal_dimension: d,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidFractalDimension(_))
            ));
        }
    }

    #[test]
    fn test_rejects_bad_size() {
        for size in [Vec2::new(0.0, 1.0), Vec2::new(1.0, -2.0), Vec2::new(f32::INFINITY, 1.0)] {
            let config = TerrainConfig::with_size(size);
            assert!(matches!(config.validate(), Err(ConfigError::InvalidSize(_, _))));
        }
    }

    #[test]
    fn test_rejects_bad_height_factor() {
        let config = TerrainConfig {
            height_factor: -0.1,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidHeightFactor(_))));
    }

    #[test]
    fn test_depth_budget() {
        let ok = TerrainConfig {
            recursion_depth: 11,
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        for depth in [12, 40, 64, u32::MAX] {
            let config = TerrainConfig {
                recursion_depth: depth,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::DepthExceedsBudget { .. })
            ));
        }
    }

    #[test]
    fn test_rejects_degenerate_spacing() {
        for size in [Vec2::new(1e-36, 1.0), Vec2::new(1.0, 1e-40)] {
            let config = TerrainConfig::with_size(size);
            assert!(matches!(config.validate(), Err(ConfigError::DegenerateSpacing(_, _))));
        }
    }

    #[test]
    fn test_extreme_but_representable_sizes_accepted() {
        let large = TerrainConfig {
            size: Vec2::splat(1e20),
            fractal_dimension: 2.99,
            recursion_depth: 2,
            ..Default::default()
        };
        assert!(large.validate().is_ok());

        let tiny = TerrainConfig {
            size: Vec2::splat(1e-20),
            recursion_depth: 4,
            ..Default::default()
        };
        assert!(tiny.validate().is_ok());
    }

    #[test]
    fn test_rejects_variance_without_headroom() {
        let config = TerrainConfig {
            size: Vec2::splat(1e37),
            fractal_dimension: 2.01,
            height_factor: 1.0,
            recursion_depth: 2,
        };
        assert!(matches!(config.validate(), Err(ConfigError::NonFiniteVariance(_))));
    }

    #[test]
    fn test_depth_zero_is_allowed() {
        let config = TerrainConfig {
            recursion_depth: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.resolution(), 2);
    }

    #[test]
    fn test_vertex_count_for_depth() {
        assert_eq!(vertex_count_for_depth(0), Some(4));
        assert_eq!(vertex_count_for_depth(1), Some(9));
        assert_eq!(vertex_count_for_depth(9), Some(513 * 513));
        assert_eq!(vertex_count_for_depth(64), None);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = TerrainConfig::from_toml_str(
            r#"
            size = [8.0, 4.0]
            recursion_depth = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.size, Vec2::new(8.0, 4.0));
        assert_eq!(config.recursion_depth, 5);
        assert_eq!(config.fractal_dimension, DEFAULT_FRACTAL_DIMENSION);
    }

    #[test]
    fn test_from_toml_invalid() {
        let err = TerrainConfig::from_toml_str("recursion_depth = \"deep\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terrain.toml");
        std::fs::write(&path, "fractal_dimension = 2.7\nheight_factor = 0.1\n").unwrap();

        let config = TerrainConfig::load(&path).unwrap();
        assert!((config.fractal_dimension - 2.7).abs() < 1e-6);
        assert!((config.height_factor - 0.1).abs() < 1e-6);
        assert_eq!(config.recursion_depth, DEFAULT_RECURSION_DEPTH);
    }
}
