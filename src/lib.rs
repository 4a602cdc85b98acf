//! Procedural heightfield terrain generator.
//!
//! This crate synthesizes terrain with recursive midpoint displacement
//! (diamond-square), estimates per-vertex normals and triangulates the grid
//! into a vertex/index mesh ready for a rendering backend.

pub mod rng;
pub mod grid;
pub mod terrain;
pub mod pipeline;
pub mod mesh;
pub mod export;

pub use grid::{Grid, GridCoord, GridError, Vertex};
pub use mesh::{Mesh, MeshVertex, RenderBackend};
pub use pipeline::{DisplacementStage, GenerationStage, NormalStage, Pipeline, PipelineError};
pub use rng::GaussianSource;
pub use terrain::{ConfigError, GenerationStats, Terrain, TerrainConfig, TerrainError};
