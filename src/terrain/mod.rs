//! Terrain generation module.
//!
//! Provides the diamond-square generator, normal estimation, triangulation and
//! the [`Terrain`] value that ties them together.

mod config;
mod diamond_square;
mod landscape;
mod normals;
mod triangulate;

pub use config::{
    vertex_count_for_depth, ConfigError, TerrainConfig, DEFAULT_FRACTAL_DIMENSION,
    DEFAULT_HEIGHT_FACTOR, DEFAULT_RECURSION_DEPTH, MAX_VERTICES,
};
pub use diamond_square::{displace_grid, GenerationStats};
pub use landscape::{Terrain, TerrainError};
pub use normals::{contributing_pairs, estimate_normals, vertex_normal};
pub use triangulate::{index_count_for_depth, triangulate};
